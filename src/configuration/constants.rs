pub mod cargo_env {
    pub const CARGO_PKG_NAME: &'static str = env!("CARGO_PKG_NAME");
}

/// Names of the request parameters understood by the forms.
pub mod params {
    pub const TEST_ID_LABEL: &'static str = "testId";
    pub const SUITE_ID_LABEL: &'static str = "suiteId";
    pub const BUILD_VERSION_LABEL: &'static str = "buildVersion";
    pub const BUILD_CHANGELIST_LABEL: &'static str = "changelist";
    pub const BUILD_CHANGELIST_OP_LABEL: &'static str = "changelistOp";
    pub const FORM_SORT_LABEL: &'static str = "sort";
    pub const FORM_COLLAPSE_LABEL: &'static str = "collapse";
    pub const FORM_HIGHLIGHT_LABEL: &'static str = "highlight";
    pub const FORM_FILTER_LABEL: &'static str = "filter";
    pub const FORM_STATUS_LABEL: &'static str = "mode";
}
