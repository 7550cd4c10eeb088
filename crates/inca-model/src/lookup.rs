use std::collections::HashMap;

/// Header names indexed case-insensitively, remembering their position.
#[derive(Debug, Clone)]
pub struct CaseInsensitiveHeaders {
    map: HashMap<String, usize>,
}

impl CaseInsensitiveHeaders {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut map = HashMap::new();
        for (index, name) in names.into_iter().enumerate() {
            let key = normalize_key(name.as_ref());
            map.entry(key).or_insert(index);
        }
        Self { map }
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.map.get(&normalize_key(name)).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(&normalize_key(name))
    }
}

fn normalize_key(name: &str) -> String {
    name.trim()
        .trim_matches('\u{feff}')
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_uppercase()
}
