use std::collections::HashMap;
use std::sync::LazyLock;

use crate::index::Primitive;

pub(crate) const STRING: &str = "String";
pub(crate) const BOOLEAN: &str = "Boolean";
pub(crate) const INT: &str = "Int";
pub(crate) const FLOAT: &str = "Float";
pub(crate) const ID: &str = "ID";
pub(crate) const BIG_INTEGER: &str = "BigInteger";
pub(crate) const BIG_DECIMAL: &str = "BigDecimal";

/// The scalars every GraphQL schema has. These are never renamed by a link.
pub(crate) const BUILT_IN_SCALARS: [&str; 5] = [STRING, BOOLEAN, INT, FLOAT, ID];

/// Scalars the execution engine knows how to coerce without a custom scalar declaration.
const EXTENDED_SCALARS: [&str; 6] = [BIG_INTEGER, BIG_DECIMAL, "Date", "Time", "DateTime", "Duration"];

static SCALARS_BY_CLASS: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("java.lang.String", STRING),
        ("java.lang.Character", STRING),
        ("java.lang.CharSequence", STRING),
        ("java.util.UUID", STRING),
        ("java.net.URL", STRING),
        ("java.net.URI", STRING),
        ("java.lang.Boolean", BOOLEAN),
        ("java.lang.Integer", INT),
        ("java.lang.Short", INT),
        ("java.lang.Byte", INT),
        ("java.util.concurrent.atomic.AtomicInteger", INT),
        ("java.lang.Long", BIG_INTEGER),
        ("java.math.BigInteger", BIG_INTEGER),
        ("java.util.concurrent.atomic.AtomicLong", BIG_INTEGER),
        ("java.lang.Float", FLOAT),
        ("java.lang.Double", FLOAT),
        ("java.math.BigDecimal", BIG_DECIMAL),
        ("java.time.LocalDate", "Date"),
        ("java.sql.Date", "Date"),
        ("java.time.LocalTime", "Time"),
        ("java.time.OffsetTime", "Time"),
        ("java.sql.Time", "Time"),
        ("java.time.LocalDateTime", "DateTime"),
        ("java.time.OffsetDateTime", "DateTime"),
        ("java.time.ZonedDateTime", "DateTime"),
        ("java.time.Instant", "DateTime"),
        ("java.util.Date", "DateTime"),
        ("java.sql.Timestamp", "DateTime"),
        ("java.time.Duration", "Duration"),
        ("java.time.Period", "Duration"),
    ])
});

pub(crate) fn for_primitive(primitive: Primitive) -> &'static str {
    match primitive {
        Primitive::Boolean => BOOLEAN,
        Primitive::Byte | Primitive::Short | Primitive::Int => INT,
        Primitive::Long => BIG_INTEGER,
        Primitive::Float | Primitive::Double => FLOAT,
        Primitive::Char => STRING,
    }
}

/// The built-in scalar a class maps to, if any.
pub(crate) fn for_class(class_name: &str) -> Option<&'static str> {
    SCALARS_BY_CLASS.get(class_name).copied()
}

pub(crate) fn is_built_in_scalar(name: &str) -> bool {
    BUILT_IN_SCALARS.contains(&name)
}

/// Whether `name` is a scalar the engine supports without a custom scalar declaration.
pub(crate) fn is_known_scalar(name: &str) -> bool {
    is_built_in_scalar(name) || EXTENDED_SCALARS.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapper_classes_and_primitives_agree() {
        assert_eq!(for_class("java.lang.Integer"), Some(for_primitive(Primitive::Int)));
        assert_eq!(for_class("java.lang.Long"), Some(for_primitive(Primitive::Long)));
        assert_eq!(for_class("java.lang.Double"), Some(for_primitive(Primitive::Double)));
        assert_eq!(for_class("com.example.Book"), None);
    }

    #[test]
    fn only_graphql_scalars_are_built_in() {
        assert!(is_built_in_scalar("ID"));
        assert!(!is_built_in_scalar("DateTime"));
        assert!(is_known_scalar("DateTime"));
        assert!(!is_known_scalar("FieldSet"));
    }
}
