/// Router Module Index
///
/// Organizes the application's routing logic into security-segregated modules,
/// enforcing a Defense-in-Depth strategy. Access control is applied explicitly
/// per group: the page tree is gated by the route-guard middleware, while the
/// API tree relies on the `CurrentUser` extractor plus the `policy` predicates
/// inside each handler.

/// Server-rendered pages (public and protected). Protection comes from the
/// `route_guard` middleware layered over the whole router, driven by the
/// static prefix lists in the `guard` module.
pub mod pages;

/// The member-facing JSON API, nested under `/api`. Every handler requires a
/// resolved session; capability checks are per-endpoint.
pub mod api;

/// Endpoints restricted exclusively to users with the Admin role
/// (member invitations). Implements mandatory authorization checks.
pub mod admin;
