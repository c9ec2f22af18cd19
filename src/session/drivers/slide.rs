use crate::config::TimingProfile;
use crate::model::DriverVariant;
use crate::session::pacer::Pacer;

use super::{select_next, AdvanceContext, AdvanceOutcome, PageDriver};

/// Переход к слайду по номеру
pub struct SlideDriver {
    total_pages: Option<usize>,
    pacer: Pacer,
    timing: TimingProfile,
}

impl SlideDriver {
    pub fn new(total_pages: Option<usize>, pacer: Pacer, timing: TimingProfile) -> Self {
        Self {
            total_pages,
            pacer,
            timing,
        }
    }
}

#[async_trait::async_trait]
impl PageDriver for SlideDriver {
    fn variant(&self) -> DriverVariant {
        DriverVariant::SlideSelect
    }

    fn total_pages(&self) -> Option<usize> {
        self.total_pages
    }

    async fn advance(&mut self, ctx: &mut AdvanceContext<'_>) -> AdvanceOutcome {
        select_next(ctx, self.total_pages, &self.pacer, &self.timing).await
    }
}
