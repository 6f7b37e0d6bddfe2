#![allow(dead_code)]

mod messages;

pub use messages::{a_answer, build_query};
pub use mock_engines::{
    EchoEngine, FixedAnswerEngine, RawWriterEngine, SilentEngine, SpyEngine, TaggingEngine,
};
