//! Interface tests for cursor operations using Cucumber.
//!
//! ```bash
//! cargo test --test interfaces
//! ```

mod steps;

use cucumber::World;
use steps::cursor_operations::CursorOperationsWorld;

#[tokio::main]
async fn main() {
    println!("\n=== Running CursorOperations Interface Tests ===\n");
    CursorOperationsWorld::cucumber()
        .fail_on_skipped()
        .run_and_exit("tests/interfaces/features/cursor_operations.feature")
        .await;
}
