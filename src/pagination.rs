//! Paginators: the query parameters they accept and the envelope they wrap list
//! responses in.

use crate::basic_types::BasicType;
use crate::openapi_builder::Parameter;
use crate::route::ParameterLocation;
use crate::schema::Schema;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Paginator {
    PageNumber {
        #[serde(default)]
        page_size_query_param: Option<String>,
    },
    LimitOffset,
    Cursor {
        #[serde(default)]
        page_size_query_param: Option<String>,
    },
}

const PAGE_SIZE_DESCRIPTION: &str = "Number of results to return per page.";
const EXAMPLE_URL: &str = "http://api.example.org/accounts/";

fn query_integer(name: &str, description: &str) -> Parameter {
    Parameter::new(name, ParameterLocation::Query, BasicType::Int.schema_or_string())
        .with_description(description)
}

fn link(example: String) -> Schema {
    Schema {
        nullable: Some(true),
        example: Some(json!(example)),
        ..Schema::typed("string", Some("uri"))
    }
}

impl Paginator {
    pub fn parameters(&self) -> Vec<Parameter> {
        match self {
            Paginator::PageNumber {
                page_size_query_param,
            } => {
                let mut parameters = vec![query_integer(
                    "page",
                    "A page number within the paginated result set.",
                )];
                if let Some(name) = page_size_query_param {
                    parameters.push(query_integer(name, PAGE_SIZE_DESCRIPTION));
                }
                parameters
            }
            Paginator::LimitOffset => vec![
                query_integer("limit", PAGE_SIZE_DESCRIPTION),
                query_integer(
                    "offset",
                    "The initial index from which to return the results.",
                ),
            ],
            Paginator::Cursor {
                page_size_query_param,
            } => {
                let mut parameters = vec![Parameter::new(
                    "cursor",
                    ParameterLocation::Query,
                    BasicType::Str.schema_or_string(),
                )
                .with_description("The pagination cursor value.")];
                if let Some(name) = page_size_query_param {
                    parameters.push(query_integer(name, PAGE_SIZE_DESCRIPTION));
                }
                parameters
            }
        }
    }

    /// Wrap an array schema into this paginator's response envelope
    pub fn paginated_response_schema(&self, results: Schema) -> Schema {
        let (next, previous) = match self {
            Paginator::PageNumber { .. } => ("?page=4", "?page=2"),
            Paginator::LimitOffset => ("?offset=400&limit=100", "?offset=200&limit=100"),
            Paginator::Cursor { .. } => ("?cursor=cD00ODY%3D", "?cursor=cj0xJnA9NDg3"),
        };

        let mut properties = IndexMap::new();
        if !matches!(self, Paginator::Cursor { .. }) {
            properties.insert(
                "count".to_string(),
                Schema {
                    example: Some(json!(123)),
                    ..Schema::typed("integer", None)
                },
            );
        }
        properties.insert("next".to_string(), link(format!("{}{}", EXAMPLE_URL, next)));
        properties.insert(
            "previous".to_string(),
            link(format!("{}{}", EXAMPLE_URL, previous)),
        );
        properties.insert("results".to_string(), results);

        Schema {
            schema_type: Some("object".to_string()),
            properties: Some(properties),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_number_parameters() {
        let paginator = Paginator::PageNumber {
            page_size_query_param: Some("page_size".to_string()),
        };
        let names: Vec<String> = paginator
            .parameters()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["page", "page_size"]);
    }

    #[test]
    fn test_limit_offset_envelope() {
        let schema = Paginator::LimitOffset
            .paginated_response_schema(Schema::array(Schema::component_ref("Item")));
        let properties = schema.properties.unwrap();
        let keys: Vec<&str> = properties.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["count", "next", "previous", "results"]);
        assert_eq!(properties["next"].nullable, Some(true));
        assert_eq!(properties["results"].schema_type.as_deref(), Some("array"));
    }

    #[test]
    fn test_cursor_envelope_has_no_count() {
        let paginator: Paginator = serde_yaml::from_str("kind: cursor\n").unwrap();
        let schema = paginator.paginated_response_schema(Schema::untyped_array());
        assert!(!schema.properties.unwrap().contains_key("count"));
        assert_eq!(paginator.parameters()[0].name, "cursor");
    }
}
