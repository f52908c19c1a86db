//! Dialogue policy module.
//!
//! The pieces of the companion's rule-based conversation policy, leaf first:
//!
//! - `validator`: Output constraints (`ConstraintSet`, `validate`)
//! - `templates`: Stage templates and the fixed safety copy (`TemplateStore`)
//! - `selector`: Injectable template choice (`TemplateSelector`)
//! - `adapter`: Placeholder substitution and theme detection
//! - `router`: Stage classification (`StageRouter`)
//!
//! # Usage
//!
//! ```
//! use kindred_core::dialogue::{ConversationStage, StageRouter};
//! use kindred_core::session::SessionContext;
//!
//! let router = StageRouter::default();
//! let context = SessionContext::init_at(0);
//! assert_eq!(
//!     router.select_stage("I feel really sad today", &context),
//!     ConversationStage::Intake
//! );
//! ```

pub mod adapter;
pub mod router;
pub mod selector;
pub mod templates;
pub mod validator;

mod response;
mod stage;
mod text;

// Re-export public API
pub use adapter::{
    TemplateVariables, adapt_template, combine_response_and_follow_up, detect_themes,
};
pub use response::StageResponse;
pub use router::{CRISIS_PHRASES, Route, RouteReason, StageRouter, StageRule};
pub use selector::{FixedSelector, RandomSelector, SeededSelector, TemplateSelector};
pub use stage::ConversationStage;
pub use templates::{
    CRISIS_SAFETY_MESSAGE, SAFE_FALLBACK_MESSAGE, StageTemplate, TemplateStore,
};
pub use text::NormalizedText;
pub use validator::{Constraint, ConstraintSet, validate, violations};
