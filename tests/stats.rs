//! Integration tests for the `stats` command.
use wastecast::cli::{SessionOpts, handle_stats_command};
use wastecast::settings::Settings;

/// A dataset size of zero is rejected once logging is up
#[test]
fn test_handle_stats_command() {
    unsafe { std::env::set_var("WASTECAST_LOG_LEVEL", "off") };

    let opts = SessionOpts {
        count: Some(0),
        seed: Some(1),
    };
    let err = handle_stats_command(&opts, Some(Settings::default())).unwrap_err();
    assert_eq!(
        err.chain().next().unwrap().to_string(),
        "Failed to generate dataset."
    );

    // Logging was initialised by the first call
    let opts = SessionOpts {
        count: None,
        seed: Some(1),
    };
    let err = handle_stats_command(&opts, Some(Settings::default())).unwrap_err();
    assert_eq!(
        err.chain().next().unwrap().to_string(),
        "Failed to initialise logging."
    );
}
