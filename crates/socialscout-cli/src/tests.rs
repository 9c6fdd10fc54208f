use socialscout_core::RunMode;

use super::*;

#[test]
fn parses_run_with_defaults() {
    let cli = Cli::try_parse_from(["socialscout", "run", "--platform", "x"])
        .expect("expected valid cli args");

    match cli.command {
        Commands::Run(args) => {
            assert_eq!(args.platform, Platform::X);
            assert_eq!(args.start, 0);
            assert_eq!(args.mode, RunMode::Fill);
            assert!(!args.fresh);
            assert!(args.input.is_none());
            assert!(args.output.is_none());
        }
        other => panic!("expected run, got {other:?}"),
    }
}

#[test]
fn parses_run_with_all_options() {
    let cli = Cli::try_parse_from([
        "socialscout",
        "run",
        "--platform",
        "twitter",
        "--start",
        "120",
        "--mode",
        "reverify",
        "--fresh",
        "--output",
        "out/x.csv",
    ])
    .unwrap();

    assert!(matches!(
        cli.command,
        Commands::Run(RunArgs {
            platform: Platform::X,
            start: 120,
            mode: RunMode::Reverify,
            fresh: true,
            output: Some(ref out),
            ..
        }) if out == &PathBuf::from("out/x.csv")
    ));
}

#[test]
fn run_requires_platform() {
    assert!(Cli::try_parse_from(["socialscout", "run"]).is_err());
}

#[test]
fn run_rejects_unknown_platform() {
    assert!(Cli::try_parse_from(["socialscout", "run", "--platform", "line"]).is_err());
}

#[test]
fn run_rejects_unknown_mode() {
    let result = Cli::try_parse_from([
        "socialscout",
        "run",
        "--platform",
        "x",
        "--mode",
        "sometimes",
    ]);
    assert!(result.is_err());
}

#[test]
fn parses_export_batch_defaults() {
    let cli = Cli::try_parse_from(["socialscout", "export-batch", "--platform", "instagram"])
        .unwrap();
    assert!(matches!(
        cli.command,
        Commands::ExportBatch {
            platform: Platform::Instagram,
            size: 5,
            ref out,
        } if out == &PathBuf::from("batch.json")
    ));
}

#[test]
fn parses_merge_with_output() {
    let cli = Cli::try_parse_from(["socialscout", "merge", "--out", "final.csv"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Merge { ref out } if out == &PathBuf::from("final.csv")
    ));
}

#[test]
fn parses_status_next() {
    let cli = Cli::try_parse_from([
        "socialscout",
        "status",
        "--platform",
        "youtube",
        "--next",
        "12",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Commands::Status {
            platform: Platform::Youtube,
            next: 12
        }
    ));
}

#[test]
fn missing_command_is_an_error() {
    assert!(Cli::try_parse_from(["socialscout"]).is_err());
}

#[tokio::test]
async fn first_interrupt_stops_and_second_returns() {
    use std::time::Duration;
    use tokio::sync::Notify;

    let notify = Arc::new(Notify::new());
    let stop = Arc::new(AtomicBool::new(false));

    let signals = Arc::clone(&notify);
    let flag = Arc::clone(&stop);
    let watcher = tokio::spawn(async move {
        watch_interrupts(
            move || {
                let signals = Arc::clone(&signals);
                async move { signals.notified().await }
            },
            &flag,
        )
        .await;
    });

    notify.notify_one();
    tokio::time::timeout(Duration::from_secs(1), async {
        while !stop.load(Ordering::SeqCst) {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("stop flag set after first interrupt");
    assert!(!watcher.is_finished());

    notify.notify_one();
    tokio::time::timeout(Duration::from_secs(1), watcher)
        .await
        .expect("watcher returns after second interrupt")
        .expect("watcher task");
}
