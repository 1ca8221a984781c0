use crate::element::NodeAttributes;

/// Represents ways to locate a child element within a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector {
    /// Select by stable automation id.
    Id(String),
    /// Select by name/label.
    Name(String),
    /// Chain multiple selectors; each link resolves within the previous
    /// link's match.
    Chain(Vec<Selector>),
    /// Represents an invalid selector string, with a reason.
    Invalid(String),
}

impl Selector {
    /// Whether a node's reported properties satisfy this (non-chain)
    /// selector.
    pub(crate) fn matches(&self, attrs: &NodeAttributes) -> bool {
        match self {
            Selector::Id(id) => attrs.id.as_deref() == Some(id.as_str()),
            Selector::Name(name) => attrs.name.as_deref() == Some(name.as_str()),
            Selector::Chain(_) | Selector::Invalid(_) => false,
        }
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl From<&str> for Selector {
    fn from(s: &str) -> Self {
        // Handle chained selectors first
        let parts: Vec<&str> = s.split(">>").map(|p| p.trim()).collect();
        if parts.len() > 1 {
            return Selector::Chain(parts.into_iter().map(Selector::from).collect());
        }

        match s {
            _ if s.starts_with("id:") => Selector::Id(s[3..].to_string()),
            _ if s.starts_with('#') => Selector::Id(s[1..].to_string()),
            _ if s.to_lowercase().starts_with("name:") => Selector::Name(s[5..].to_string()),
            // Bare strings are treated as names; anything with an unknown
            // prefix is rejected rather than guessed at.
            _ if !s.is_empty() && !s.contains(':') => Selector::Name(s.to_string()),
            _ => Selector::Invalid(format!(
                "Unknown selector format: \"{s}\". Use 'id:', '#', or 'name:' to specify the selector type."
            )),
        }
    }
}

impl From<String> for Selector {
    fn from(s: String) -> Self {
        Selector::from(s.as_str())
    }
}
