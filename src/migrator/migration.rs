/// A versioned schema change assembled from its up/down script files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migration {
    pub version: i32,
    pub name: String,
    pub up_script: Option<String>,
    pub down_script: Option<String>,
}

impl Migration {
    pub fn new(version: i32, name: impl Into<String>) -> Self {
        Self {
            version,
            name: name.into(),
            up_script: None,
            down_script: None,
        }
    }

    pub fn with_up(mut self, sql: impl Into<String>) -> Self {
        self.up_script = Some(sql.into());
        self
    }

    pub fn with_down(mut self, sql: impl Into<String>) -> Self {
        self.down_script = Some(sql.into());
        self
    }

    pub fn has_up(&self) -> bool {
        self.up_script.is_some()
    }

    pub fn has_down(&self) -> bool {
        self.down_script.is_some()
    }
}
