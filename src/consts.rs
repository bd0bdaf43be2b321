pub mod cli_consts {
    //! Dashboard Configuration Constants
    //!
    //! Defaults for the sync loop, banners and export, organized by
    //! functional area.

    // =============================================================================
    // QUEUE CONFIGURATION
    // =============================================================================

    /// The maximum number of events to keep in the activity logs.
    pub const MAX_ACTIVITY_LOGS: usize = 100;

    /// Buffer size of the channel carrying fetch results to the dashboard state
    pub const UPDATE_QUEUE_SIZE: usize = 100;

    // =============================================================================
    // SYNC CONFIGURATION
    // =============================================================================

    /// Sync loop timing
    pub mod sync {
        use std::time::Duration;

        /// Period of the recurring refresh (seconds)
        pub const REFRESH_INTERVAL_SECS: u64 = 30;

        /// Days of environment history requested from the backend
        pub const HISTORY_DAYS: u32 = 7;

        /// Connect and request timeout of the HTTP client (seconds)
        pub const REQUEST_TIMEOUT_SECS: u64 = 10;

        /// Helper function to get the refresh interval
        pub const fn refresh_interval() -> Duration {
            Duration::from_secs(REFRESH_INTERVAL_SECS)
        }

        /// Helper function to get the request timeout
        pub const fn request_timeout() -> Duration {
            Duration::from_secs(REQUEST_TIMEOUT_SECS)
        }
    }

    // =============================================================================
    // BACKEND ENDPOINTS
    // =============================================================================

    pub mod endpoints {
        /// Environment readings, one series per metric
        pub const ENVIRONMENTAL_DATA: &str = "api/environmental-data";

        /// Current pest/disease risk prediction
        pub const PREDICTIONS: &str = "api/predictions";
    }

    // =============================================================================
    // UI CONFIGURATION
    // =============================================================================

    pub mod ui {
        use std::time::Duration;

        /// Seconds a banner stays on screen unless dismissed earlier
        pub const NOTICE_TTL_SECS: u64 = 5;

        /// Delay between the entrance of consecutive cards (milliseconds)
        pub const CARD_STAGGER_MS: u64 = 120;

        /// How long the splash screen is shown
        pub const SPLASH_DURATION: Duration = Duration::from_secs(2);

        /// Maximum banners rendered at once
        pub const MAX_VISIBLE_NOTICES: usize = 3;

        pub const fn notice_ttl() -> Duration {
            Duration::from_secs(NOTICE_TTL_SECS)
        }

        pub const fn card_stagger() -> Duration {
            Duration::from_millis(CARD_STAGGER_MS)
        }
    }

    // =============================================================================
    // EXPORT CONFIGURATION
    // =============================================================================

    /// File name of the CSV export
    pub const EXPORT_FILE_NAME: &str = "agricultural_data.csv";
}
