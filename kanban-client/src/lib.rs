//! # Kanban Client Library
//!
//! Client side of the drag-and-drop protocol: a local board snapshot that
//! is updated optimistically, the requests that persist a drop, and the
//! rollback when the server refuses one.
//!
//! ## Modules
//!
//! - `board`: Board snapshot (lists with their cards)
//! - `session`: Drag state, optimistic drops and rollback
//! - `transport`: How drops reach the server (HTTP, or a mock for tests)
//!
//! ## Example
//!
//! ```no_run
//! use kanban_client::session::{BoardSession, DropOutcome};
//! use kanban_client::transport::{BoardTransport, HttpTransport};
//!
//! # async fn example() -> Result<(), kanban_client::transport::ClientError> {
//! let transport = HttpTransport::login("http://localhost:8080", "ana@example.com", "secret1").await?;
//! let mut session = BoardSession::new(transport.load_board(1).await?);
//!
//! session.start_card_drag(5)?;
//! match session.drop_card(2, &transport).await {
//!     DropOutcome::Committed(card) => println!("card now at {}", card.position),
//!     DropOutcome::RolledBack(e) => println!("drop undone: {}", e),
//!     DropOutcome::NoOp => {}
//! }
//! # Ok(())
//! # }
//! ```

pub mod board;
pub mod session;
pub mod transport;
