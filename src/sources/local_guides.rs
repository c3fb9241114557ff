use std::time::Duration;

use async_trait::async_trait;

use super::error::Result;
use super::{DataSource, HiddenGem, LocalGuidesData, LocalInsight, SourceData, SourceKind};
use crate::query::Query;

const PROVIDER: &str = "Local Guides Network";
const QUALITY_SCORE: f64 = 0.95;

/// Insider tips, hidden gems and etiquette from local guides
#[derive(Debug, Clone, Default)]
pub struct LocalGuidesSource {
    latency: Duration,
}

impl LocalGuidesSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

fn guide_data(destination: &str) -> LocalGuidesData {
    LocalGuidesData {
        insights: vec![
            LocalInsight {
                location: format!("{destination} Historical Fort"),
                tip: "Visit early morning to avoid crowds and get best photography light"
                    .to_string(),
                insider_info: "Secret viewpoint accessible through the eastern gate".to_string(),
                guide_rating: 4.8,
            },
            LocalInsight {
                location: format!("{destination} Market Area"),
                tip: "Best bargaining happens after 6 PM when vendors want to close deals"
                    .to_string(),
                insider_info: "Try the famous kulfi vendor in the corner, a local favourite"
                    .to_string(),
                guide_rating: 4.6,
            },
        ],
        hidden_gems: vec![
            HiddenGem {
                name: format!("Hidden Temple of {destination}"),
                gem_type: "spiritual".to_string(),
                description: "Ancient temple known only to locals, peaceful and serene"
                    .to_string(),
                location: "Ask locals for \"Gupta Mandir\"".to_string(),
                best_time: "Early morning or sunset".to_string(),
                guide_rating: 4.9,
            },
            HiddenGem {
                name: format!("{destination} Sunset Point"),
                gem_type: "scenic".to_string(),
                description: "Unmarked hilltop with breathtaking sunset views".to_string(),
                location: "15 minutes walk from main market".to_string(),
                best_time: "1 hour before sunset".to_string(),
                guide_rating: 4.7,
            },
        ],
        customs: vec![
            "Remove shoes before entering religious places".to_string(),
            "Dress modestly when visiting temples and heritage sites".to_string(),
            "Bargaining is expected in local markets".to_string(),
            "Try to learn basic local greetings, locals appreciate the effort".to_string(),
        ],
        provider: PROVIDER.to_string(),
        quality_score: QUALITY_SCORE,
    }
}

#[async_trait]
impl DataSource for LocalGuidesSource {
    fn kind(&self) -> SourceKind {
        SourceKind::LocalGuides
    }

    async fn fetch(&self, query: &Query) -> Result<SourceData> {
        super::simulate_latency(self.latency).await;
        Ok(SourceData::LocalGuides(guide_data(query.destination())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insights_reference_destination() {
        let data = guide_data("Rishikesh");
        assert_eq!(data.insights[0].location, "Rishikesh Historical Fort");
        assert_eq!(data.hidden_gems.len(), 2);
        assert_eq!(data.customs.len(), 4);
    }
}
