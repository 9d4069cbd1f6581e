//! Repository identifier to source-archive URL resolution
//!
//! The execution service fetches repository contents itself; this module
//! only decides which URL it should fetch them from.

use std::sync::LazyLock;
use url::Url;

/// Host serving public repository archives
pub const PUBLIC_ARCHIVE_HOST: &str = "https://sourcegraph.com";

static PUBLIC_ARCHIVE_BASE: LazyLock<Url> =
    LazyLock::new(|| Url::parse(PUBLIC_ARCHIVE_HOST).expect("constant archive host is valid"));

/// Short or mirrored identifiers mapped to their public repository
const ALIASES: &[(&str, &str)] = &[
    ("AC/activeadmin", "github.com/activeadmin/activeadmin"),
    ("ACTG/acts-as-taggable-on", "github.com/mbleigh/acts-as-taggable-on"),
    ("AD/administrate", "github.com/thoughtbot/administrate"),
    ("CAN/cancancan", "github.com/CanCanCommunity/cancancan"),
    ("DEV/devise", "github.com/plataformatec/devise"),
    ("DIS/discourse", "github.com/discourse/discourse"),
    ("FAK/faker", "github.com/faker-ruby/faker"),
    ("LIQ/liquid", "github.com/Shopify/liquid"),
    ("LOG/logstash", "github.com/elastic/logstash"),
    ("OP/openproject", "github.com/opf/openproject"),
    ("SID/sidekiq", "github.com/mperham/sidekiq"),
    ("SOL/solidus", "github.com/solidusio/solidus"),
    ("SPREE/spree", "github.com/spree/spree"),
    ("github.com/sd9/openapi-generator", "github.com/OpenAPITools/openapi-generator"),
    ("github.com/sd9/redbird", "github.com/OptimalBits/redbird"),
    ("github.com/sd9org/react-router", "github.com/ReactTraining/react-router"),
    ("github.com/sd9/react-loading-spinner", "github.com/sourcegraph/react-loading-spinner"),
    ("github.com/sd9/graphql-dotnet", "github.com/graphql-dotnet/graphql-dotnet"),
    ("github.com/sd9/taskbotjs", "github.com/eropple/taskbotjs"),
    ("github.com/sd9/ReactStateMuseum", "github.com/GantMan/ReactStateMuseum"),
];

/// Look up the public identifier for an aliased repository
pub fn canonical_name(repository: &str) -> Option<&'static str> {
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == repository)
        .map(|(_, canonical)| *canonical)
}

/// A resolved archive location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveUrl {
    pub url: String,

    /// False when the URL points at the deployment itself, which needs an
    /// access token the client does not attach
    pub public: bool,
}

/// Resolve `repository` at `commit` to an archive URL.
///
/// Aliased repositories and every repository on an open deployment (one
/// whose host is listed in `open_hosts`) use the public archive host.
/// Anything else is served by the deployment at `origin`.
pub fn resolve(origin: &Url, open_hosts: &[String], repository: &str, commit: &str) -> ArchiveUrl {
    let canonical = canonical_name(repository);
    let open_deployment = origin
        .host_str()
        .is_some_and(|host| open_hosts.iter().any(|h| h == host));

    if canonical.is_some() || open_deployment {
        let name = canonical.unwrap_or(repository);
        return ArchiveUrl {
            url: raw_archive_url(&PUBLIC_ARCHIVE_BASE, name, commit),
            public: true,
        };
    }

    ArchiveUrl {
        url: raw_archive_url(origin, repository, commit),
        public: false,
    }
}

/// `<base origin>/<name>@<commit>/-/raw/`, percent-encoding each segment.
///
/// `/` in `name` separates segments; anything else that is not legal in a
/// path segment (spaces, `#`, `?`) is escaped rather than ending the path.
fn raw_archive_url(base: &Url, name: &str, commit: &str) -> String {
    let mut url = base.clone();
    url.set_query(None);
    url.set_fragment(None);
    // Credentials never belong in an archive URL; both calls only fail on
    // URLs without a host.
    let _ = url.set_username("");
    let _ = url.set_password(None);

    let (parents, leaf) = match name.rsplit_once('/') {
        Some((parents, leaf)) => (Some(parents), leaf),
        None => (None, name),
    };

    // http(s) origins always have a path; `parse_origin` rejects anything else.
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.clear();
        if let Some(parents) = parents {
            segments.extend(parents.split('/'));
        }
        segments
            .push(&format!("{}@{}", leaf, commit))
            .extend(["-", "raw", ""]);
    }

    url.into()
}
