#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Mountain {
    pub name: String,
    pub difficulty_level: u32,
    pub length: u32,
}

impl Mountain {
    pub fn new(name: &str, difficulty_level: u32, length: u32) -> Self {
        Self {
            name: name.to_string(),
            difficulty_level,
            length,
        }
    }
}
