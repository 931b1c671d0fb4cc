//! Fixed table of basic OpenAPI types.

use crate::schema::Schema;
use serde::{Deserialize, Serialize};

/// Named basic type usable wherever a whole record is not needed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BasicType {
    Number,
    Float,
    Double,
    Bool,
    Str,
    Byte,
    Binary,
    Int,
    Int32,
    Int64,
    Uuid,
    Uri,
    Ip4,
    Ip6,
    Hostname,
    Decimal,
    #[serde(alias = "date-time")]
    DateTime,
    Date,
    Time,
    Email,
    Object,
    File,
    /// No body at all
    None,
}

impl BasicType {
    /// Schema for this type, `None` for [`BasicType::None`]
    pub fn schema(self) -> Option<Schema> {
        let schema = match self {
            BasicType::Number => Schema::typed("number", None),
            BasicType::Float => Schema::typed("number", Some("float")),
            BasicType::Double | BasicType::Decimal => Schema::typed("number", Some("double")),
            BasicType::Bool => Schema::typed("boolean", None),
            BasicType::Str => Schema::typed("string", None),
            BasicType::Byte => Schema::typed("string", Some("byte")),
            BasicType::Binary | BasicType::File => Schema::typed("string", Some("binary")),
            BasicType::Int => Schema::typed("integer", None),
            BasicType::Int32 => Schema::typed("integer", Some("int32")),
            BasicType::Int64 => Schema::typed("integer", Some("int64")),
            BasicType::Uuid => Schema::typed("string", Some("uuid")),
            BasicType::Uri => Schema::typed("string", Some("uri")),
            BasicType::Ip4 => Schema::typed("string", Some("ipv4")),
            BasicType::Ip6 => Schema::typed("string", Some("ipv6")),
            BasicType::Hostname => Schema::typed("string", Some("hostname")),
            BasicType::DateTime => Schema::typed("string", Some("date-time")),
            BasicType::Date => Schema::typed("string", Some("date")),
            BasicType::Time => Schema::typed("string", Some("time")),
            BasicType::Email => Schema::typed("string", Some("email")),
            BasicType::Object => Schema::free_form_object(),
            BasicType::None => return None,
        };
        Some(schema)
    }

    /// Schema for this type; [`BasicType::None`] falls back to a plain string
    pub fn schema_or_string(self) -> Schema {
        self.schema()
            .unwrap_or_else(|| Schema::typed("string", None))
    }
}
