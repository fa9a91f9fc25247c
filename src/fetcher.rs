//! fetcher.rs
//!
//! Builds a `StatsRecord` or a `ContributorRecord` from several GitHub calls.
//!
//! Calls are either critical or best effort:
//!   • the initial user query is critical; a transport failure, a GraphQL
//!     `errors` payload or a missing user aborts the whole fetch
//!   • star pagination, the REST search refinements, the discussion lookup
//!     and avatar downloads are best effort; they return `BestEffort<T>` and
//!     fall back to what is already known

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{NaiveDate, SecondsFormat};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::error::{BestEffort, FetchError};
use crate::github::GithubClient;
use crate::stats::{AvatarImage, ContributorRecord, RepoEntry, StatKind, StatsRecord};

const PAGE_SIZE: u32 = 100;
pub const DEFAULT_CONTRIB_LIMIT: usize = 10;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CountObj {
    total_count: u64,
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: Option<UserWrapper<T>>,
}

#[derive(Deserialize)]
struct UserWrapper<T> {
    user: Option<T>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    has_next_page: bool,
    end_cursor: Option<String>,
}

#[derive(Deserialize)]
struct StarNode {
    stargazers: CountObj,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StarPage {
    #[serde(default)]
    nodes: Vec<StarNode>,
    page_info: PageInfo,
}

impl StarPage {
    fn stars(&self) -> u64 {
        self.nodes.iter().map(|n| n.stargazers.total_count).sum()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContributionsCollection {
    total_commit_contributions: u64,
    total_pull_request_review_contributions: u64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserStatsNode {
    name: Option<String>,
    login: String,
    contributions_collection: ContributionsCollection,
    repositories_contributed_to: CountObj,
    pull_requests: CountObj,
    merged_pull_requests: CountObj,
    open_issues: CountObj,
    closed_issues: CountObj,
    followers: CountObj,
    repositories: StarPage,
}

#[derive(Deserialize)]
struct StarPageUser {
    repositories: StarPage,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DiscussionsUser {
    repository_discussions: CountObj,
    repository_discussion_comments: CountObj,
}

#[derive(Deserialize)]
struct SearchCount {
    total_count: u64,
}

/// What to fetch for the stats card.
#[derive(Debug, Clone, Default)]
pub struct StatsRequest {
    pub username: String,
    /// Replace the yearly commit count with the all-time REST search count.
    pub include_all_commits: bool,
    /// Restrict contribution totals to one calendar year.
    pub commits_year: Option<i32>,
    /// Stats beyond the defaults; discussion kinds trigger an extra query.
    pub extra: Vec<StatKind>,
}

#[derive(Debug, Clone)]
pub struct ContribRequest {
    pub username: String,
    /// `owner/name` entries to leave out.
    pub exclude: Vec<String>,
    pub limit: usize,
    /// Download owner avatars and embed them in the card.
    pub embed_avatars: bool,
}

impl Default for ContribRequest {
    fn default() -> Self {
        Self {
            username: String::new(),
            exclude: Vec::new(),
            limit: DEFAULT_CONTRIB_LIMIT,
            embed_avatars: true,
        }
    }
}

fn user_from<T: DeserializeOwned>(json: Value, login: &str) -> Result<T, FetchError> {
    let envelope: Envelope<T> = serde_json::from_value(json)?;
    envelope
        .data
        .and_then(|d| d.user)
        .ok_or_else(|| FetchError::UserNotFound {
            login: login.to_string(),
        })
}

/// RFC 3339 bounds of `year`: Jan 1 00:00:00 to Dec 31 23:59:59 UTC.
pub fn year_window(year: i32) -> Option<(String, String)> {
    let from = NaiveDate::from_ymd_opt(year, 1, 1)?
        .and_hms_opt(0, 0, 0)?
        .and_utc();
    let to = NaiveDate::from_ymd_opt(year, 12, 31)?
        .and_hms_opt(23, 59, 59)?
        .and_utc();
    Some((
        from.to_rfc3339_opts(SecondsFormat::Secs, true),
        to.to_rfc3339_opts(SecondsFormat::Secs, true),
    ))
}

fn user_stats_query(windowed: bool) -> String {
    let (params, window) = if windowed {
        (", $from: DateTime!, $to: DateTime!", "(from: $from, to: $to)")
    } else {
        ("", "")
    };

    format!(
        r#"
        query userInfo($login: String!{params}) {{
          user(login: $login) {{
            name
            login
            contributionsCollection{window} {{
              totalCommitContributions
              totalPullRequestReviewContributions
            }}
            repositoriesContributedTo(
              first: 1
              includeUserRepositories: true
              contributionTypes: [COMMIT, ISSUE, PULL_REQUEST, REPOSITORY]
            ) {{
              totalCount
            }}
            pullRequests(first: 1) {{
              totalCount
            }}
            mergedPullRequests: pullRequests(states: MERGED) {{
              totalCount
            }}
            openIssues: issues(states: OPEN) {{
              totalCount
            }}
            closedIssues: issues(states: CLOSED) {{
              totalCount
            }}
            followers {{
              totalCount
            }}
            repositories(
              first: {PAGE_SIZE}
              ownerAffiliations: OWNER
              orderBy: {{direction: DESC, field: STARGAZERS}}
            ) {{
              nodes {{
                stargazers {{
                  totalCount
                }}
              }}
              pageInfo {{
                hasNextPage
                endCursor
              }}
            }}
          }}
        }}
        "#
    )
}

async fn fetch_star_page(
    client: &GithubClient,
    login: &str,
    cursor: &str,
) -> Result<StarPage, FetchError> {
    let query = format!(
        r#"
        query userRepos($login: String!, $after: String!) {{
          user(login: $login) {{
            repositories(
              first: {PAGE_SIZE}
              after: $after
              ownerAffiliations: OWNER
              orderBy: {{direction: DESC, field: STARGAZERS}}
            ) {{
              nodes {{
                stargazers {{
                  totalCount
                }}
              }}
              pageInfo {{
                hasNextPage
                endCursor
              }}
            }}
          }}
        }}
        "#
    );

    let json = client
        .graphql(&query, json!({ "login": login, "after": cursor }))
        .await?;
    let user: StarPageUser = user_from(json, login)?;
    Ok(user.repositories)
}

/// Stars on the pages after the first one. Stops at the first failed page.
async fn remaining_stars(client: &GithubClient, login: &str, first: PageInfo) -> BestEffort<u64> {
    let mut total = 0u64;
    let mut page_info = first;

    while page_info.has_next_page {
        let Some(cursor) = page_info.end_cursor.take() else {
            return BestEffort::fallback(total, "page reported more results without a cursor");
        };
        match fetch_star_page(client, login, &cursor).await {
            Ok(page) => {
                total = total.saturating_add(page.stars());
                page_info = page.page_info;
            }
            Err(e) => {
                tracing::warn!("star pagination for {login} stopped early: {e}");
                return BestEffort::fallback(total, e.to_string());
            }
        }
    }

    BestEffort::fetched(total)
}

async fn search_count(
    client: &GithubClient,
    path: &str,
    headers: &[(&str, &str)],
) -> Result<u64, FetchError> {
    let json = client.rest_get(&client.rest_url(path), headers).await?;
    let count: SearchCount = serde_json::from_value(json)?;
    Ok(count.total_count)
}

/// All-time commit count from the commit search API.
async fn all_time_commits(client: &GithubClient, login: &str, fallback: u64) -> BestEffort<u64> {
    BestEffort::or_fallback(
        search_count(
            client,
            &format!("/search/commits?q=author:{login}"),
            &[("Accept", "application/vnd.github.cloak-preview+json")],
        )
        .await,
        fallback,
        "commit search",
    )
}

/// Issue count from the issue search API, which also sees issues opened in
/// repositories the user does not own.
async fn searched_issues(client: &GithubClient, login: &str, fallback: u64) -> BestEffort<u64> {
    BestEffort::or_fallback(
        search_count(
            client,
            &format!("/search/issues?q=author:{login}+type:issue"),
            &[],
        )
        .await,
        fallback,
        "issue search",
    )
}

async fn discussion_counts(client: &GithubClient, login: &str) -> BestEffort<(u64, u64)> {
    const QUERY: &str = r#"
        query userDiscussions($login: String!) {
          user(login: $login) {
            repositoryDiscussions {
              totalCount
            }
            repositoryDiscussionComments(onlyAnswers: true) {
              totalCount
            }
          }
        }
    "#;

    let result = async {
        let json = client.graphql(QUERY, json!({ "login": login })).await?;
        let user: DiscussionsUser = user_from(json, login)?;
        Ok::<_, FetchError>((
            user.repository_discussions.total_count,
            user.repository_discussion_comments.total_count,
        ))
    }
    .await;

    BestEffort::or_fallback(result, (0, 0), "discussion lookup")
}

/// Fetches every counter the stats card can show.
pub async fn fetch_stats(
    client: &GithubClient,
    req: &StatsRequest,
) -> Result<StatsRecord, FetchError> {
    let login = req.username.as_str();

    let window = req.commits_year.and_then(|year| {
        let w = year_window(year);
        if w.is_none() {
            tracing::warn!("ignoring out-of-range commits year {year}");
        }
        w
    });

    let mut variables = json!({ "login": login });
    if let Some((from, to)) = &window {
        variables["from"] = json!(from);
        variables["to"] = json!(to);
    }

    tracing::debug!(login, windowed = window.is_some(), "fetching user stats");
    let json = client
        .graphql(&user_stats_query(window.is_some()), variables)
        .await?;
    let user: UserStatsNode = user_from(json, login)?;

    let first_page_stars = user.repositories.stars();
    let more_stars = remaining_stars(client, login, user.repositories.page_info).await;

    let yearly_commits = user.contributions_collection.total_commit_contributions;
    let commits = if req.include_all_commits {
        all_time_commits(client, login, yearly_commits).await
    } else {
        BestEffort::fetched(yearly_commits)
    };

    let graphql_issues = user.open_issues.total_count + user.closed_issues.total_count;
    let issues = searched_issues(client, login, graphql_issues).await;

    let discussions = if req.extra.iter().any(|kind| kind.is_discussion()) {
        discussion_counts(client, login).await
    } else {
        BestEffort::fetched((0, 0))
    };

    let degraded = [
        more_stars.is_degraded(),
        commits.is_degraded(),
        issues.is_degraded(),
        discussions.is_degraded(),
    ]
    .into_iter()
    .filter(|d| *d)
    .count();
    if degraded > 0 {
        tracing::info!(login, degraded, "some counters fell back to partial values");
    }

    let (discussions_started, discussions_answered) = discussions.value;

    Ok(StatsRecord {
        name: user.name.filter(|n| !n.is_empty()).unwrap_or_else(|| user.login.clone()),
        login: user.login,
        commits: commits.value,
        prs: user.pull_requests.total_count,
        prs_merged: user.merged_pull_requests.total_count,
        issues: issues.value,
        stars: first_page_stars.saturating_add(more_stars.value),
        contributed_to: user.repositories_contributed_to.total_count,
        followers: user.followers.total_count,
        reviews: user
            .contributions_collection
            .total_pull_request_review_contributions,
        discussions_started,
        discussions_answered,
    })
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Owner {
    avatar_url: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContribNode {
    name_with_owner: String,
    #[serde(default)]
    is_private: bool,
    stargazers: CountObj,
    owner: Owner,
}

#[derive(Deserialize)]
struct ContribNodes {
    #[serde(default)]
    nodes: Vec<ContribNode>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContribUser {
    repositories_contributed_to: ContribNodes,
}

/// A contributed-to repository before its avatar is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoCandidate {
    pub name: String,
    pub stars: u64,
    pub avatar_url: String,
}

/// Drops excluded names, sorts by stars (stable) and keeps the top `limit`.
pub fn select_top_repos(
    mut candidates: Vec<RepoCandidate>,
    exclude: &[String],
    limit: usize,
) -> Vec<RepoCandidate> {
    candidates.retain(|c| !exclude.iter().any(|e| e.trim().eq_ignore_ascii_case(&c.name)));
    candidates.sort_by(|a, b| b.stars.cmp(&a.stars));
    candidates.truncate(limit);
    candidates
}

async fn embed_avatar(client: &GithubClient, url: &str) -> BestEffort<Option<AvatarImage>> {
    match client.fetch_image(url).await {
        Ok((mime, bytes)) => BestEffort::fetched(Some(AvatarImage {
            mime,
            data: BASE64.encode(bytes),
        })),
        Err(e) => {
            tracing::warn!("avatar {url} not embedded: {e}");
            BestEffort::fallback(None, e.to_string())
        }
    }
}

/// Fetches the public repositories `username` contributed to, best first.
pub async fn fetch_contributor_stats(
    client: &GithubClient,
    req: &ContribRequest,
) -> Result<ContributorRecord, FetchError> {
    const QUERY: &str = r#"
        query userContribs($login: String!) {
          user(login: $login) {
            repositoriesContributedTo(
              first: 100
              includeUserRepositories: true
              contributionTypes: [COMMIT, PULL_REQUEST, REPOSITORY, PULL_REQUEST_REVIEW]
              orderBy: {direction: DESC, field: STARGAZERS}
            ) {
              nodes {
                nameWithOwner
                isPrivate
                stargazers {
                  totalCount
                }
                owner {
                  login
                  avatarUrl
                }
              }
            }
          }
        }
    "#;

    let login = req.username.as_str();
    tracing::debug!(login, limit = req.limit, "fetching contributed repositories");

    let json = client.graphql(QUERY, json!({ "login": login })).await?;
    let user: ContribUser = user_from(json, login)?;

    let candidates = user
        .repositories_contributed_to
        .nodes
        .into_iter()
        .filter(|n| !n.is_private)
        .map(|n| RepoCandidate {
            name: n.name_with_owner,
            stars: n.stargazers.total_count,
            avatar_url: n.owner.avatar_url,
        })
        .collect();

    let mut repos = Vec::new();
    for candidate in select_top_repos(candidates, &req.exclude, req.limit) {
        let avatar = if req.embed_avatars {
            embed_avatar(client, &candidate.avatar_url).await.value
        } else {
            None
        };
        repos.push(RepoEntry {
            name: candidate.name,
            stars: candidate.stars,
            avatar,
        });
    }

    Ok(ContributorRecord { repos })
}
