pub mod derived;
pub mod hcp;
pub mod interaction;

pub use derived::{FollowupResult, TrendSummary};
pub use hcp::{Hcp, HcpDraft, HcpReceipt};
pub use interaction::{
    DraftError, FormData, Interaction, InteractionDraft, InteractionReceipt, InteractionSummary,
    Mode, Status,
};
