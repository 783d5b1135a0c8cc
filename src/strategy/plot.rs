use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlotLine {
    pub color: String,
}

/// Named lines grouped into the main price panel and named subplots
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlotConfig {
    pub main_plot: BTreeMap<String, PlotLine>,
    pub subplots: BTreeMap<String, BTreeMap<String, PlotLine>>,
}

impl PlotConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn main_line(mut self, column: &str, color: &str) -> Self {
        self.main_plot.insert(
            column.to_string(),
            PlotLine {
                color: color.to_string(),
            },
        );
        self
    }

    pub fn subplot_line(mut self, panel: &str, column: &str, color: &str) -> Self {
        self.subplots.entry(panel.to_string()).or_default().insert(
            column.to_string(),
            PlotLine {
                color: color.to_string(),
            },
        );
        self
    }

    /// Every column referenced by any panel
    pub fn columns(&self) -> Vec<&str> {
        self.main_plot
            .keys()
            .chain(self.subplots.values().flat_map(|panel| panel.keys()))
            .map(|k| k.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_groups_panels() {
        let plot = PlotConfig::new()
            .subplot_line("Diff", "%train_buy", "mediumaquamarine")
            .subplot_line("Diff", "predict_buy", "cornflowerblue");

        assert!(plot.main_plot.is_empty());
        assert_eq!(plot.subplots["Diff"].len(), 2);
        assert_eq!(plot.columns(), vec!["%train_buy", "predict_buy"]);
    }
}
