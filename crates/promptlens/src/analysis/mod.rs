//! The analysis pipeline.
//!
//! An [`AnalysisInput`] is validated into an [`AnalysisRequest`], turned into
//! a [`PromptPair`] by the [`composer`], sent to a
//! [`TextModel`](crate::model::TextModel) once, and the first text block of
//! the reply is turned into an [`AnalysisResult`] by the
//! [`ResponseNormalizer`]. [`AnalysisHandler`] runs the whole sequence and
//! reports it through [`EventHandler`].
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`request`] | Wire input, validation, [`InputKind`] |
//! | [`composer`] | Fixed system prompt and the analysis template |
//! | [`normalizer`] | Fence stripping, strict parsing, schema validation |
//! | [`result`] | [`AnalysisResult`] and its parts |
//! | [`handler`] | [`AnalysisHandler`] |
//! | [`events`] | Lifecycle events and handlers |
//! | [`style`] | Catalog of known style DNA descriptors |
//! | [`record`] | Storage row for a completed analysis |

pub mod composer;
pub mod config;
pub mod events;
pub mod handler;
pub mod normalizer;
pub mod record;
pub mod request;
pub mod result;
pub mod style;

pub use composer::{PromptPair, compose};
pub use config::AnalysisConfig;
pub use events::{
    AnalysisEvent, CompositeEventHandler, EventHandler, FnEventHandler, LoggingHandler,
    NoopHandler,
};
pub use handler::AnalysisHandler;
pub use normalizer::{FENCE_RULES, FenceRule, ResponseNormalizer, strip_fences};
pub use record::AnalysisRecord;
pub use request::{AnalysisInput, AnalysisRequest, InputKind};
pub use result::{AnalysisResult, ComponentPrompts, Confidence};
pub use style::{STYLE_TRAITS, StyleCategory, StyleTrait};
