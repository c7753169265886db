//! The four protocol controllers (§4.2–§4.5), each driving one state
//! machine to completion through the Transport Layer.
pub mod account;
pub mod authz;
pub mod order;
pub mod revoke;
