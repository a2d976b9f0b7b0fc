//! Shared test support and end-to-end delivery scenarios
