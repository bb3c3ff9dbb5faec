/*!
 * Request extractors for catalog handlers
 *
 * Public API:
 * - CurrentIdentity
 */

mod identity;

pub use identity::CurrentIdentity;
