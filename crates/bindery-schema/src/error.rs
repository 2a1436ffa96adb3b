use thiserror::Error as ThisError;

///
/// SchemaError
///
/// Declaration and resolution failures. Once a class resolves successfully
/// its schema is cached and these cannot occur again for that class.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum SchemaError {
    #[error("unknown class '{class}'")]
    UnknownClass { class: String },

    #[error("class '{class}' is already registered with a different declaration")]
    DuplicateClass { class: String },

    #[error("parent chain of class '{class}' contains a cycle")]
    ParentCycle { class: String },

    #[error("class '{class}' declares a field with an empty name")]
    EmptyFieldName { class: String },

    #[error("class '{class}' declares field '{field}' more than once")]
    DuplicateField { class: String, field: String },

    #[error("field '{class}.{field}' uses a reserved name")]
    ReservedField { class: String, field: String },

    #[error("field '{class}.{field}' declares an empty enum value set")]
    EmptyEnum { class: String, field: String },

    #[error("identifier '{name}' exceeds the maximum length of {max}")]
    NameTooLong { name: String, max: usize },
}
