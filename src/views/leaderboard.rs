use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::{
    api::FeedApi,
    models::LeaderboardRow,
    views::Line,
};

/// Rows shown, regardless of how many the server returns.
pub const TOP_N: usize = 5;

/// Read-only 24h karma ranking.
pub struct LeaderboardPanel {
    api: Arc<dyn FeedApi>,
    token: CancellationToken,
    loading: bool,
    rows: Vec<LeaderboardRow>,
}

impl LeaderboardPanel {
    pub fn new(api: Arc<dyn FeedApi>, token: CancellationToken) -> Self {
        Self {
            api,
            token,
            loading: true,
            rows: Vec::new(),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// The first [`TOP_N`] rows in server order.
    pub fn rows(&self) -> &[LeaderboardRow] {
        &self.rows[..self.rows.len().min(TOP_N)]
    }

    /// Fetches the ranking. If the panel was torn down while the request
    /// was in flight, the result is dropped.
    pub async fn load(&mut self) {
        let result = self.api.fetch_leaderboard().await;
        if self.token.is_cancelled() {
            tracing::debug!("Leaderboard torn down, dropping fetch result");
            return;
        }

        self.rows = result.unwrap_or_else(|e| {
            tracing::error!("Leaderboard fetch error: {}", e);
            Vec::new()
        });
        self.loading = false;
    }

    pub fn render(&self) -> Vec<Line> {
        if self.loading {
            return vec![Line::new(0, "Loading leaderboard…")];
        }
        if self.rows.is_empty() {
            return vec![Line::new(0, "No activity in last 24 hours")];
        }

        let mut out = vec![Line::new(0, format!("Top {} (24h)", TOP_N))];
        for (i, row) in self.rows().iter().enumerate() {
            out.push(Line::new(
                0,
                format!("{} {} — {}", rank_badge(i + 1), row.display_name, row.total_karma),
            ));
        }
        out
    }
}

/// Cosmetic marker for a 1-based rank.
pub fn rank_badge(rank: usize) -> String {
    match rank {
        1 => "🥇".to_string(),
        2 => "🥈".to_string(),
        3 => "🥉".to_string(),
        n => format!("#{}", n),
    }
}
