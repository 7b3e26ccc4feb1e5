//! Field type mapping from specification tags to Go types.
//!
//! The mapping is a fixed table with a dynamic fallback. Unknown tags degrade
//! to `any` unless a [`TypeMapper`] runs in strict mode, in which case they are
//! reported as errors so specification typos surface at generation time.
//!
//! | tag                       | Go type     |
//! |---------------------------|-------------|
//! | `text`, `string`, `email` | `string`    |
//! | `bool`                    | `bool`      |
//! | `uuid`                    | `uuid.UUID` |
//! | `int`                     | `int`       |
//! | `int64`                   | `int64`     |
//! | `float64`                 | `float64`   |
//! | anything else             | `any`       |

/// Go type emitted for `uuid` fields; requires the uuid package import.
pub const GO_UUID_TYPE: &str = "uuid.UUID";

/// Go type emitted for tags without a mapping.
pub const GO_DYNAMIC_TYPE: &str = "any";

fn lookup(tag: &str) -> Option<&'static str> {
    match tag {
        "text" | "string" | "email" => Some("string"),
        "bool" => Some("bool"),
        "uuid" => Some(GO_UUID_TYPE),
        "int" => Some("int"),
        "int64" => Some("int64"),
        "float64" => Some("float64"),
        _ => None,
    }
}

/// Maps a field type tag to its Go type, falling back to `any`.
///
/// # Examples
/// ```
/// use aquamarine::core::types::map_type;
///
/// assert_eq!(map_type("email"), "string");
/// assert_eq!(map_type("float64"), "float64");
/// assert_eq!(map_type("frobnicate"), "any");
/// ```
pub fn map_type(tag: &str) -> &'static str {
    lookup(tag).unwrap_or(GO_DYNAMIC_TYPE)
}

/// Returns true when the tag has an explicit mapping.
pub fn is_mapped(tag: &str) -> bool {
    lookup(tag).is_some()
}

/// Type mapper carrying the strictness policy for unmapped tags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TypeMapper {
    strict: bool,
}

impl TypeMapper {
    /// Permissive mapper: unknown tags become `any`.
    pub fn permissive() -> Self {
        Self { strict: false }
    }

    /// Strict mapper: unknown tags are rejected.
    pub fn strict() -> Self {
        Self { strict: true }
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Maps a tag, returning `None` only when strict and the tag is unknown.
    pub fn map(&self, tag: &str) -> Option<&'static str> {
        match lookup(tag) {
            Some(go_type) => Some(go_type),
            None if self.strict => None,
            None => Some(GO_DYNAMIC_TYPE),
        }
    }
}
