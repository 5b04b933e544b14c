pub trait ToDashSeparators {
    /// Returns a copy with all `/` replaced by `-` and leading/trailing
    /// whitespace trimmed.
    fn to_dash_separators(&self) -> String;
}

impl ToDashSeparators for str {
    fn to_dash_separators(&self) -> String {
        self.trim().replace('/', "-")
    }
}

impl ToDashSeparators for String {
    fn to_dash_separators(&self) -> String {
        self.as_str().to_dash_separators()
    }
}

pub trait NameKey {
    /// Lowercased with all whitespace removed, so "Heng Thirith" and
    /// "HENGTHIRITH" compare equal.
    fn name_key(&self) -> String;
}

impl NameKey for str {
    fn name_key(&self) -> String {
        self.chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect()
    }
}
