//! Container-level column naming rules.

use heck::{ToLowerCamelCase, ToSnakeCase, ToUpperCamelCase};

/// How column labels are derived from field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenameRule {
    /// Column label is the field name as written.
    #[default]
    None,
    CamelCase,
    PascalCase,
    SnakeCase,
    Lowercase,
}

impl RenameRule {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "camelCase" => Some(Self::CamelCase),
            "PascalCase" => Some(Self::PascalCase),
            "snake_case" => Some(Self::SnakeCase),
            "lowercase" => Some(Self::Lowercase),
            _ => None,
        }
    }

    pub fn apply(self, field: &str) -> String {
        match self {
            Self::None => field.to_string(),
            Self::CamelCase => field.to_lower_camel_case(),
            Self::PascalCase => field.to_upper_camel_case(),
            Self::SnakeCase => field.to_snake_case(),
            Self::Lowercase => field.to_lowercase(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camel_case_joins_words() {
        assert_eq!(RenameRule::CamelCase.apply("phone_number"), "phoneNumber");
        assert_eq!(RenameRule::CamelCase.apply("id"), "id");
    }

    #[test]
    fn none_keeps_field_name() {
        assert_eq!(RenameRule::None.apply("phone_number"), "phone_number");
    }

    #[test]
    fn unknown_rule_is_rejected() {
        assert_eq!(RenameRule::parse("kebab-case"), None);
        assert_eq!(RenameRule::parse("PascalCase"), Some(RenameRule::PascalCase));
    }
}
