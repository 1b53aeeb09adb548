use serde::{Deserialize, Serialize};

/// Fixed series/slice colors, handed out by index and cycling once exhausted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorPalette {
    colors: Vec<String>,
}

impl ColorPalette {
    pub fn new(colors: Vec<String>) -> Self {
        Self { colors }
    }

    /// The five colors the chat renderer has always used.
    pub fn standard() -> Self {
        Self::new(
            ["#8884d8", "#82ca9d", "#ffc658", "#ff8042", "#8dd1e1"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Color for the `index`-th series or slice (`index mod len`).
    ///
    /// Returns `None` only for an empty palette, which `ChartConfig::validate` rejects.
    pub fn color_at(&self, index: usize) -> Option<&str> {
        if self.colors.is_empty() {
            return None;
        }
        Some(self.colors[index % self.colors.len()].as_str())
    }

    /// The first color, used for single-fill marks (histogram bars, bubbles).
    pub fn primary(&self) -> Option<&str> {
        self.color_at(0)
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::standard()
    }
}
