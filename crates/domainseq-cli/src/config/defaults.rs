pub struct DefaultsConfig {
    pub temperature: f64,
    pub shuffle: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            temperature: 37.0,
            shuffle: false,
        }
    }
}
