/// Name of the environment variable containing the path to the traph configuration file.
/// The file is only read when the variable is set.
pub const ENV_CONFIG_PATH: &str = "TRAPH_CONFIG_PATH";

/// Name of the environment variable overriding the input validation mode
/// (`strict`, `pass-through` or `off`).
pub const ENV_VALIDATION: &str = "TRAPH_VALIDATION";

/// Warning emitted (once per diagnostics sink) when inputs are bound without validation.
pub const WARN_VALIDATION_DISABLED: &str =
    "traph: input records are not validated, missing keys read as null placeholders.";
