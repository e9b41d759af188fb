//! Application services for identity use cases.

mod commands;
mod identity_service;

pub use commands::{
    ChangeUserContactInformationCommand, ChangeUserPasswordCommand,
    ChangeUserPersonalNameCommand, DefineUserEnablementCommand, EnablementInput,
    RegisterUserCommand,
};
pub use identity_service::{IdentityApplicationService, IdentityService};
