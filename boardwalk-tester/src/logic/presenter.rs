use async_trait::async_trait;
use boardwalk_game::{
    BadgeTone, CardFace, Notice, NoticeLevel, PresentError, Presenter, QuoteDecision, QuoteView,
};
use colored::Colorize;

/// Presenter for headless runs: acknowledges every card at once and answers
/// the unmortgage dialog with a fixed decision.
#[derive(Debug, Clone)]
pub struct HeadlessPresenter {
    decision: QuoteDecision,
    verbose: bool,
    pub cards_shown: usize,
    pub quotes_shown: usize,
    pub notices: Vec<Notice>,
    pub stats_refreshes: usize,
}

impl HeadlessPresenter {
    #[must_use]
    pub const fn new(decision: QuoteDecision, verbose: bool) -> Self {
        Self {
            decision,
            verbose,
            cards_shown: 0,
            quotes_shown: 0,
            notices: Vec::new(),
            stats_refreshes: 0,
        }
    }
}

#[async_trait(?Send)]
impl Presenter for HeadlessPresenter {
    async fn show_card(&mut self, face: &CardFace) -> Result<(), PresentError> {
        self.cards_shown += 1;
        if self.verbose {
            let badge = face.badge.as_ref().map_or_else(String::new, |badge| match badge.tone {
                BadgeTone::Positive => format!(" [{}]", badge.text.green()),
                BadgeTone::Negative => format!(" [{}]", badge.text.red()),
            });
            println!("    🃏 {} #{}: {}{badge}", face.label.bold(), face.card_id, face.text);
        }
        Ok(())
    }

    async fn confirm_unmortgage(&mut self, view: &QuoteView) -> Result<QuoteDecision, PresentError> {
        self.quotes_shown += 1;
        if self.verbose {
            println!(
                "    🏦 {}: ${} + interest = ${} (funds ${} -> ${})",
                view.name.bold(),
                view.base_value,
                view.total_cost,
                view.funds_before,
                view.funds_after
            );
        }
        Ok(self.decision)
    }

    fn notify(&mut self, notice: &Notice) {
        if self.verbose {
            let message = match notice.level {
                NoticeLevel::Info => notice.message.cyan(),
                NoticeLevel::Warning => notice.message.yellow(),
                NoticeLevel::Error => notice.message.red(),
            };
            println!("    ⚠️  {}: {message}", notice.title);
        }
        self.notices.push(notice.clone());
    }

    fn refresh_stats(&mut self) -> Result<(), PresentError> {
        self.stats_refreshes += 1;
        Ok(())
    }
}
