pub mod budget_service;
pub mod disbursement_service;
pub mod document_service;
pub mod eligibility_service;
pub mod filter_option_service;
pub mod funding_request_service;
pub mod grant_service;
pub mod indicator_service;
pub mod pledge_service;

pub use budget_service::*;
pub use disbursement_service::*;
pub use document_service::*;
pub use eligibility_service::*;
pub use filter_option_service::*;
pub use funding_request_service::*;
pub use grant_service::*;
pub use indicator_service::*;
pub use pledge_service::*;
