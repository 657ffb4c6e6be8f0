//! XSD built-in datatypes and their per-target representations.
//!
//! # Type Mapping Table
//!
//! | XSD type | Go | Rust | TypeScript |
//! |----------|----|------|------------|
//! | `string`, `token`, `Name`, `anyURI`, `QName`, `ID`, ... | `string` | `String` | `string` |
//! | `boolean` | `bool` | `bool` | `boolean` |
//! | `byte` / `short` / `int` / `long` | `int8` / `int16` / `int` / `int64` | `i8` / `i16` / `i32` / `i64` | `number` |
//! | `integer` and its sign-restricted forms | `int` | `i64` | `number` |
//! | `unsignedByte` ... `unsignedLong` | `uint8` ... `uint64` | `u8` ... `u64` | `number` |
//! | `float` / `double` / `decimal` | `float32` / `float64` / `float64` | `f32` / `f64` / `f64` | `number` |
//! | `base64Binary`, `hexBinary` | `[]byte` | `Vec<u8>` | `string` |
//! | `dateTime` | `time.Time` | `DateTime<Utc>` | `string` |
//! | `date`, `time`, `duration`, `gYear`, ... | `string` | `String` | `string` |
//! | `IDREFS`, `NMTOKENS`, `ENTITIES` | `[]string` | `Vec<String>` | `string[]` |
//! | `anyType`, `anySimpleType` | `interface{}` | `String` | `unknown` |

/// Target-independent classification of an XSD built-in datatype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    String,
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    /// Unbounded `xs:integer` and its sign-restricted derivatives.
    Integer,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    Decimal,
    Bytes,
    DateTime,
    /// Calendar and duration types carried as lexical strings.
    Temporal,
    StringList,
    Any,
}

impl Builtin {
    /// Classify a namespace-stripped XSD type name.
    ///
    /// Returns `None` for names that are not XSD built-ins; those refer to
    /// declarations in the proto tree (or nowhere).
    pub fn from_xsd(local_name: &str) -> Option<Self> {
        let builtin = match local_name {
            // String family.
            "string" | "normalizedString" | "token" | "language" | "Name" | "NCName" | "ID"
            | "IDREF" | "ENTITY" | "NMTOKEN" | "QName" | "NOTATION" | "anyURI" => Self::String,

            "boolean" => Self::Bool,

            // Fixed-width signed integers.
            "byte" => Self::Int8,
            "short" => Self::Int16,
            "int" => Self::Int32,
            "long" => Self::Int64,
            "integer" | "nonPositiveInteger" | "negativeInteger" | "nonNegativeInteger"
            | "positiveInteger" => Self::Integer,

            // Unsigned integers.
            "unsignedByte" => Self::UInt8,
            "unsignedShort" => Self::UInt16,
            "unsignedInt" => Self::UInt32,
            "unsignedLong" => Self::UInt64,

            "float" => Self::Float32,
            "double" => Self::Float64,
            "decimal" => Self::Decimal,

            "base64Binary" | "hexBinary" => Self::Bytes,

            "dateTime" => Self::DateTime,
            "date" | "time" | "duration" | "gYear" | "gYearMonth" | "gMonth" | "gMonthDay"
            | "gDay" | "dateTimeStamp" | "dayTimeDuration" | "yearMonthDuration" => {
                Self::Temporal
            }

            "IDREFS" | "NMTOKENS" | "ENTITIES" => Self::StringList,

            "anyType" | "anySimpleType" | "anyAtomicType" => Self::Any,

            _ => return None,
        };
        Some(builtin)
    }

    /// Whether rendering this builtin needs a date-time import.
    pub fn is_date_time(self) -> bool {
        self == Self::DateTime
    }

    /// Go spelling.
    pub fn go(self) -> &'static str {
        match self {
            Self::String | Self::Temporal => "string",
            Self::Bool => "bool",
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 | Self::Integer => "int",
            Self::Int64 => "int64",
            Self::UInt8 => "uint8",
            Self::UInt16 => "uint16",
            Self::UInt32 => "uint32",
            Self::UInt64 => "uint64",
            Self::Float32 => "float32",
            Self::Float64 | Self::Decimal => "float64",
            Self::Bytes => "[]byte",
            Self::DateTime => "time.Time",
            Self::StringList => "[]string",
            Self::Any => "interface{}",
        }
    }

    /// Rust spelling.
    pub fn rust(self) -> &'static str {
        match self {
            Self::String | Self::Temporal | Self::Any => "String",
            Self::Bool => "bool",
            Self::Int8 => "i8",
            Self::Int16 => "i16",
            Self::Int32 => "i32",
            Self::Int64 | Self::Integer => "i64",
            Self::UInt8 => "u8",
            Self::UInt16 => "u16",
            Self::UInt32 => "u32",
            Self::UInt64 => "u64",
            Self::Float32 => "f32",
            Self::Float64 | Self::Decimal => "f64",
            Self::Bytes => "Vec<u8>",
            Self::DateTime => "DateTime<Utc>",
            Self::StringList => "Vec<String>",
        }
    }

    /// TypeScript spelling.
    pub fn typescript(self) -> &'static str {
        match self {
            Self::String | Self::Temporal | Self::Bytes | Self::DateTime => "string",
            Self::Bool => "boolean",
            Self::Int8
            | Self::Int16
            | Self::Int32
            | Self::Int64
            | Self::Integer
            | Self::UInt8
            | Self::UInt16
            | Self::UInt32
            | Self::UInt64
            | Self::Float32
            | Self::Float64
            | Self::Decimal => "number",
            Self::StringList => "string[]",
            Self::Any => "unknown",
        }
    }
}
