use std::ops::Deref;

/// A bound struct field: the resolved value plus the flag metadata it came from
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlagField<T> {
    /// Alias names the value can be given under
    pub names: Vec<String>,
    /// Environment variable used as fallback, if any
    pub env: Option<String>,
    /// Human-readable description of what this flag does
    pub description: String,
    /// The resolved value
    pub value: T,
}

impl<T> FlagField<T> {
    pub fn new(
        names: Vec<String>,
        env: Option<String>,
        description: impl Into<String>,
        value: T,
    ) -> Self {
        Self {
            names,
            env,
            description: description.into(),
            value,
        }
    }

    /// Unwrap the field into its value
    pub fn into_inner(self) -> T {
        self.value
    }
}

// Allow using FlagField<T> as &T without writing .value
impl<T> Deref for FlagField<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl<T> AsRef<T> for FlagField<T> {
    fn as_ref(&self) -> &T {
        &self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn port_field(value: u16) -> FlagField<u16> {
        FlagField::new(
            vec!["-p".to_string(), "--port".to_string()],
            Some("PORT".to_string()),
            "Server port",
            value,
        )
    }

    #[test]
    fn test_field_creation() {
        let field = port_field(8080);

        assert_eq!(field.names, ["-p", "--port"]);
        assert_eq!(field.env.as_deref(), Some("PORT"));
        assert_eq!(field.description, "Server port");
        assert_eq!(field.value, 8080);
        assert_eq!(*field, 8080);
    }

    #[test]
    fn test_deref_implementation() {
        let field = port_field(8080);

        let doubled = *field * 2;
        assert_eq!(doubled, 16160);
    }

    #[test]
    fn test_as_ref_implementation() {
        let field = FlagField::new(vec!["--name".to_string()], None, "", "my-service".to_string());

        let name_ref: &String = field.as_ref();
        assert_eq!(name_ref, "my-service");
        assert_eq!(field.len(), 10);
    }

    #[test]
    fn test_into_inner() {
        let field = FlagField::new(vec!["-v".to_string()], None, "", vec![1, 2]);
        assert_eq!(field.into_inner(), vec![1, 2]);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serialize() {
        let json = serde_json::to_string(&port_field(9000)).unwrap();

        assert!(json.contains("\"names\":[\"-p\",\"--port\"]"));
        assert!(json.contains("\"env\":\"PORT\""));
        assert!(json.contains("\"value\":9000"));
    }
}
