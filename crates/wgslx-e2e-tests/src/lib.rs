//! End-to-end tests for the wgslx minifier live under `tests/`.
