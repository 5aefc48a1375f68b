//! HTTP front end for the `extractqa` question answering library.

pub mod gateway;
