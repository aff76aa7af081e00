/// Keys whose derived label would come out wrong.
const LABEL_OVERRIDES: &[(&str, &str)] = &[
    ("Registryaddress", "Registry Address"),
    ("hcName", "HC Name"),
    ("hcSignature", "HC Signature"),
    ("nhf", "NHF"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldEntry {
    pub key: String,
    pub label: String,
}

/// Ordered `(key, label)` table driving what a rendered document shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSpec {
    entries: Vec<FieldEntry>,
}

impl FieldSpec {
    /// Labels every key with its override or its derived label.
    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries = keys
            .into_iter()
            .map(|key| {
                let key = key.as_ref();
                FieldEntry {
                    key: key.to_string(),
                    label: label_for_key(key),
                }
            })
            .collect();

        Self { entries }
    }

    pub fn with_field(mut self, key: impl Into<String>, label: impl Into<String>) -> Self {
        self.entries.push(FieldEntry {
            key: key.into(),
            label: label.into(),
        });
        self
    }

    pub fn entries(&self) -> &[FieldEntry] {
        &self.entries
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub fn label_for_key(key: &str) -> String {
    LABEL_OVERRIDES
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, label)| label.to_string())
        .unwrap_or_else(|| derive_label(key))
}

/// Splits a key at word boundaries and capitalizes each word.
///
/// Boundaries are `_`, `-` and whitespace, a lowercase-to-uppercase
/// transition, and any letter/digit transition, so `nextOfKin_name2`
/// becomes `Next Of Kin Name 2`.
pub fn derive_label(key: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut prev: Option<char> = None;

    for c in key.chars() {
        if c == '_' || c == '-' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev = None;
            continue;
        }

        let boundary = match prev {
            Some(p) => {
                (p.is_lowercase() && c.is_uppercase())
                    || (p.is_alphabetic() && c.is_ascii_digit())
                    || (p.is_ascii_digit() && c.is_alphabetic())
            }
            None => false,
        };

        if boundary && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }

        current.push(c);
        prev = Some(c);
    }

    if !current.is_empty() {
        words.push(current);
    }

    words
        .iter()
        .map(|word| capitalize(word))
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
