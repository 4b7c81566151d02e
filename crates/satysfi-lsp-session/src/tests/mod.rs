//! Behaviour tests for the session manager.

mod support;
