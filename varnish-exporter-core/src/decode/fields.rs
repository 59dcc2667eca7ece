use crate::decode::FieldName;
use std::collections::BTreeMap;

/// Field values decoded from one log line.
///
/// Optional fields that were not on the line are absent, never empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedFields {
    values: BTreeMap<FieldName, String>,
}

impl DecodedFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: FieldName) -> Option<&str> {
        self.values.get(&name).map(String::as_str)
    }

    pub fn contains(&self, name: FieldName) -> bool {
        self.values.contains_key(&name)
    }

    /// Insert a value unless the field was already seen on this line.
    pub fn insert(&mut self, name: FieldName, value: String) -> bool {
        if self.values.contains_key(&name) {
            return false;
        }
        self.values.insert(name, value);
        true
    }

    pub fn remove(&mut self, name: FieldName) -> Option<String> {
        self.values.remove(&name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<const N: usize> From<[(FieldName, &str); N]> for DecodedFields {
    fn from(pairs: [(FieldName, &str); N]) -> Self {
        let mut fields = DecodedFields::new();
        for (name, value) in pairs {
            fields.insert(name, value.to_string());
        }
        fields
    }
}
