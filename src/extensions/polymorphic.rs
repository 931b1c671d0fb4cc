//! Discriminated unions over several records.

use super::RecordExtension;
use crate::descriptor::{FieldKind, RecordDescriptor, POLYMORPHIC_PROXY};
use crate::error::{Error, Result};
use crate::schema::{Discriminator, Schema};
use crate::schema_generator::{Direction, SchemaGenerator};
use indexmap::IndexMap;
use serde_json::Value;

/// Maps a polymorphic proxy record to `oneOf` plus a discriminator
pub struct PolymorphicProxyExtension;

impl RecordExtension for PolymorphicProxyExtension {
    fn target(&self) -> &str {
        POLYMORPHIC_PROXY
    }

    fn name(&self, record: &RecordDescriptor) -> Option<String> {
        record.polymorphic.as_ref().map(|p| p.component_name.clone())
    }

    fn map_record(
        &self,
        generator: &mut SchemaGenerator<'_>,
        record: &RecordDescriptor,
        direction: Direction,
    ) -> Result<Schema> {
        let Some(spec) = &record.polymorphic else {
            return Err(Error::InvariantViolation(format!(
                "record \"{}\" is handled as a polymorphic proxy but declares no candidates",
                record.type_path
            )));
        };

        let catalog = generator.catalog();
        let mut one_of = Vec::new();
        let mut mapping = IndexMap::new();
        for key in &spec.records {
            let Some(sub_record) = catalog.record(key) else {
                generator.diagnostics_mut().error(format!(
                    "polymorphic record \"{}\" lists unknown record \"{}\"",
                    spec.component_name, key
                ));
                continue;
            };
            let Some(component) = generator.resolve_record(sub_record, direction)? else {
                continue;
            };

            let value = match discriminator_value(sub_record, &spec.resource_type_field_name) {
                Some(value) => value,
                None => {
                    generator.diagnostics_mut().warn(format!(
                        "could not read a fixed value of \"{}\" from \"{}\"; using \"{}\" as discriminator value",
                        spec.resource_type_field_name, sub_record.name, component.name
                    ));
                    component.name.clone()
                }
            };

            let reference = component.ref_schema();
            if let Some(target) = reference.reference.clone() {
                mapping.insert(value, target);
            }
            one_of.push(reference);
        }

        Ok(Schema {
            one_of: Some(one_of),
            discriminator: Some(Discriminator {
                property_name: spec.resource_type_field_name.clone(),
                mapping,
            }),
            ..Default::default()
        })
    }
}

/// Literal default of the discriminator field, or its only choice
fn discriminator_value(record: &RecordDescriptor, field_name: &str) -> Option<String> {
    let field = record.field(field_name)?;
    let value = match (field.literal_default(), &field.kind) {
        (Some(value), _) => value,
        (None, FieldKind::Choice { choices }) if choices.len() == 1 => &choices[0],
        _ => return None,
    };
    Some(match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::descriptor::FieldDescriptor;
    use crate::extensions::ExtensionRegistry;
    use crate::settings::Settings;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn pet_catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog
            .add_record(
                RecordDescriptor::new("zoo.CatSerializer", "CatSerializer")
                    .with_field(FieldDescriptor::new("kind", FieldKind::Char).with_default(json!("cat")))
                    .with_field(FieldDescriptor::new("lives", FieldKind::Integer { min_value: None, max_value: None })),
            )
            .unwrap();
        catalog
            .add_record(
                RecordDescriptor::new("zoo.DogSerializer", "DogSerializer")
                    .with_field(FieldDescriptor::new(
                        "kind",
                        FieldKind::Choice {
                            choices: vec![json!("dog")],
                        },
                    ))
                    .with_field(FieldDescriptor::new("bark", FieldKind::Char)),
            )
            .unwrap();
        catalog
            .add_record(
                RecordDescriptor::new("zoo.FishSerializer", "FishSerializer")
                    .with_field(FieldDescriptor::new("kind", FieldKind::Char)),
            )
            .unwrap();
        catalog
    }

    #[test]
    fn test_one_of_with_discriminator_mapping() {
        let catalog = pet_catalog();
        let settings = Settings::default();
        let extensions = ExtensionRegistry::with_builtins();
        let mut generator = SchemaGenerator::new(&catalog, &settings, &extensions);

        let proxy = RecordDescriptor::polymorphic(
            "zoo.PetProxy",
            "Pet",
            vec!["zoo.CatSerializer".to_string(), "zoo.DogSerializer".to_string()],
            "kind",
        );
        let component = generator.resolve_record(&proxy, Direction::Response).unwrap().unwrap();
        assert_eq!(component.name, "Pet");

        let value = serde_json::to_value(component.schema().unwrap()).unwrap();
        assert_eq!(
            value,
            json!({
                "oneOf": [
                    {"$ref": "#/components/schemas/Cat"},
                    {"$ref": "#/components/schemas/Dog"}
                ],
                "discriminator": {
                    "propertyName": "kind",
                    "mapping": {
                        "cat": "#/components/schemas/Cat",
                        "dog": "#/components/schemas/Dog"
                    }
                }
            })
        );
        assert_eq!(generator.registry().len(), 3);
        assert!(generator.diagnostics().is_empty());
    }

    #[test]
    fn test_unfixed_discriminator_falls_back_to_component_name() {
        let catalog = pet_catalog();
        let settings = Settings::default();
        let extensions = ExtensionRegistry::with_builtins();
        let mut generator = SchemaGenerator::new(&catalog, &settings, &extensions);

        let proxy = RecordDescriptor::polymorphic(
            "zoo.PetProxy",
            "Pet",
            vec!["zoo.FishSerializer".to_string(), "zoo.Missing".to_string()],
            "kind",
        );
        let component = generator.resolve_record(&proxy, Direction::Response).unwrap().unwrap();
        let discriminator = component.schema().unwrap().discriminator.clone().unwrap();
        assert_eq!(
            discriminator.mapping.get("Fish").map(String::as_str),
            Some("#/components/schemas/Fish")
        );
        assert_eq!(generator.diagnostics().warnings().count(), 1);
        assert_eq!(generator.diagnostics().errors().count(), 1);
    }

    #[test]
    fn test_proxy_without_candidates_is_invariant_violation() {
        let catalog = Catalog::new();
        let settings = Settings::default();
        let extensions = ExtensionRegistry::with_builtins();
        let mut generator = SchemaGenerator::new(&catalog, &settings, &extensions);

        let mut record = RecordDescriptor::new("zoo.Broken", POLYMORPHIC_PROXY);
        record.class_path = vec![POLYMORPHIC_PROXY.to_string()];
        let err = generator.map_record(&record, Direction::Response).unwrap_err();
        assert!(matches!(err, Error::InvariantViolation(_)));
    }
}
