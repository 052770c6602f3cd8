/*!
 * Security context extractor
 *
 * Responsibility:
 * - リクエスト単位のセキュリティ状態 (SecurityContext) を handler に提供する
 * - HTTP / axum 依存は core に閉じ込め、型定義は types に分離する
 *
 * Public API:
 * - SecurityContext / AuthenticationOutcome / RejectReason
 * - SecurityCtx (extractor)
 */

mod core;
mod types;

pub use self::core::SecurityCtx;
pub use self::types::{AuthenticationOutcome, RejectReason, SecurityContext};
