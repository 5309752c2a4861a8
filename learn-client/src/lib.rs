mod analytics;
pub use analytics::{Analytics, CategoryRollup, SubjectCoverage, TopicCoverage, Totals, TOP_N};

mod config;
pub use config::{Config, DEFAULT_API_BASE};

mod dashboard;
pub use dashboard::{Dashboard, Removal, SubtopicForm, Target, Update, Updated};

mod error;
pub use error::Error;

mod explorer;
pub use explorer::{Explorer, ExplorerMsg, Row, Table};

mod http;
pub use http::HttpGateway;

mod selection;
pub use selection::Selection;

mod tree;
pub use tree::ContentTree;

pub mod api {
    pub use learn_api::*;
}
