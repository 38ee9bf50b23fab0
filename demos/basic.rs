//! # Basic dispatcher example
//!
//! A download manager publishes `progress` events to two subscribers:
//! - a progress bar that lives for the whole run,
//! - a flaky notifier that fails once and is then dropped without unregistering.
//!
//! ## Run
//! ```bash
//! cargo run --example basic
//! ```

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use weakcast::{AsyncEventWithSender, HandlerError, HandlerFn, SenderHandlerRef};

#[derive(Clone, Debug)]
struct Download {
    url: &'static str,
}

#[derive(Clone, Copy, Debug)]
struct Progress {
    percent: u8,
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let progress = AsyncEventWithSender::<Download, Progress>::builder()
        .name("progress")
        .max_concurrent(4)
        .build();

    let bar: SenderHandlerRef<Download, Progress> = HandlerFn::arc(
        "progress-bar",
        |dl: Download, p: Progress, ctx: CancellationToken| async move {
            if ctx.is_cancelled() {
                return Err(HandlerError::Canceled);
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
            println!("[bar] {} {:>3}%", dl.url, p.percent);
            Ok(())
        },
    );

    let calls = Arc::new(AtomicU32::new(0));
    let notifier: SenderHandlerRef<Download, Progress> = {
        let calls = Arc::clone(&calls);
        HandlerFn::arc(
            "notifier",
            move |dl: Download, p: Progress, _ctx: CancellationToken| {
                let calls = Arc::clone(&calls);
                async move {
                    if calls.fetch_add(1, Ordering::Relaxed) == 0 {
                        return Err(HandlerError::fail("smtp unavailable"));
                    }
                    println!("[notifier] {} reached {}%", dl.url, p.percent);
                    Ok(())
                }
            },
        )
    };

    progress.register(&bar);
    let _guard = progress.subscribe(&notifier);
    println!("handlers registered: {}", progress.handler_count());

    let dl = Download {
        url: "https://example.com/big.iso",
    };
    let token = CancellationToken::new();

    for percent in [10, 50] {
        match progress.invoke(&dl, &Progress { percent }, token.clone()).await {
            Ok(()) => println!("{percent}%: all handlers succeeded"),
            Err(e) => println!("{percent}%: {e} -> {}", e.as_message()),
        }
    }

    // The notifier's owner goes away without unregistering; the guard still
    // exists but the handler itself is reclaimed.
    drop(notifier);
    progress
        .invoke(&dl, &Progress { percent: 100 }, token.clone())
        .await?;
    println!("handlers after cleanup: {}", progress.handler_count());

    Ok(())
}
