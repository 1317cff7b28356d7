//! Digital Asset Standard (DAS) indexer client.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use chaindrop_core::{GroupQuery, IndexError, IndexingService, WorkItem};
use chaindrop_rpc::{JsonRpcRequest, RpcTransport, TransportError};

/// Ownership block of a DAS asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ownership {
    pub owner: String,
}

/// One asset as returned by `getAssetsByGroup`. Fields not listed are kept
/// only through `content`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DasAsset {
    pub id: String,
    pub ownership: Ownership,
    #[serde(default)]
    pub burnt: bool,
    #[serde(default)]
    pub content: Option<Value>,
}

impl DasAsset {
    pub fn owner(&self) -> &str {
        &self.ownership.owner
    }
}

/// Metadata-update work for every live asset, in indexer order.
pub fn metadata_update_items(assets: &[DasAsset]) -> Vec<WorkItem> {
    assets
        .iter()
        .filter(|a| !a.burnt)
        .map(|a| WorkItem::update_metadata(a.id.clone(), a.owner()))
        .collect()
}

#[derive(Debug, Deserialize)]
struct AssetPage {
    items: Option<Vec<DasAsset>>,
}

/// [`IndexingService`] backed by a DAS-capable RPC endpoint.
pub struct DasClient {
    transport: Arc<dyn RpcTransport>,
    next_id: AtomicU64,
}

impl DasClient {
    pub fn new(transport: Arc<dyn RpcTransport>) -> Self {
        Self {
            transport,
            next_id: AtomicU64::new(1),
        }
    }
}

fn envelope(query: &GroupQuery, page: u32, limit: u32) -> Value {
    json!({
        "groupKey": query.group_key,
        "groupValue": query.group_value,
        "limit": limit,
        "page": page,
        "displayOptions": {
            "showClosedAccounts": query.show_closed_accounts,
            "showZeroBalance": query.show_zero_balance,
        },
    })
}

#[async_trait]
impl IndexingService for DasClient {
    type Item = DasAsset;

    async fn query_group(
        &self,
        query: &GroupQuery,
        page: u32,
        limit: u32,
    ) -> Result<Option<Vec<DasAsset>>, IndexError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let req = JsonRpcRequest::new(id, "getAssetsByGroup", envelope(query, page, limit));
        let resp = self
            .transport
            .send(req)
            .await
            .map_err(|e: TransportError| IndexError::Transport(e.to_string()))?;

        let result = resp
            .into_optional_result()
            .map_err(|e| IndexError::Rejected(format!("{} (code {})", e.message, e.code)))?;
        let Some(result) = result else {
            tracing::warn!(page, "getAssetsByGroup returned no result");
            return Ok(None);
        };
        let page_body: AssetPage =
            serde_json::from_value(result).map_err(|e| IndexError::Decode(e.to_string()))?;
        Ok(page_body.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chaindrop_core::{PaginationError, Paginator};
    use chaindrop_rpc::{JsonRpcError, JsonRpcResponse};
    use std::sync::Mutex;

    struct PagedTransport {
        pages: Vec<JsonRpcResponse>,
        seen: Mutex<Vec<Value>>,
    }

    #[async_trait]
    impl RpcTransport for PagedTransport {
        async fn send(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse, TransportError> {
            let mut seen = self.seen.lock().unwrap();
            let n = seen.len();
            seen.push(req.params.clone());
            self.pages
                .get(n)
                .cloned()
                .ok_or_else(|| TransportError::Http("no more pages".into()))
        }

        fn url(&self) -> &str {
            "paged"
        }
    }

    fn asset(id: &str, owner: &str, burnt: bool) -> Value {
        json!({ "id": id, "ownership": { "owner": owner, "delegated": false }, "burnt": burnt, "interface": "V1_NFT" })
    }

    fn page(items: Vec<Value>) -> JsonRpcResponse {
        JsonRpcResponse::success(
            chaindrop_rpc::RpcId::Number(1),
            json!({ "total": items.len(), "limit": 2, "page": 1, "items": items }),
        )
    }

    fn transport(pages: Vec<JsonRpcResponse>) -> Arc<PagedTransport> {
        Arc::new(PagedTransport {
            pages,
            seen: Mutex::new(Vec::new()),
        })
    }

    #[tokio::test]
    async fn sends_group_envelope() {
        let t = transport(vec![page(vec![])]);
        let client = DasClient::new(t.clone());
        let items = client
            .query_group(&GroupQuery::collection("COLL"), 3, 1000)
            .await
            .unwrap();
        assert_eq!(items, Some(vec![]));

        let params = t.seen.lock().unwrap()[0].clone();
        assert_eq!(params["groupKey"], "collection");
        assert_eq!(params["groupValue"], "COLL");
        assert_eq!(params["page"], 3);
        assert_eq!(params["limit"], 1000);
        assert_eq!(params["displayOptions"]["showClosedAccounts"], true);
        assert_eq!(params["displayOptions"]["showZeroBalance"], true);
    }

    #[tokio::test]
    async fn missing_result_is_none() {
        let mut resp = page(vec![]);
        resp.result = None;
        let client = DasClient::new(transport(vec![resp]));
        let items = client
            .query_group(&GroupQuery::collection("COLL"), 1, 10)
            .await
            .unwrap();
        assert!(items.is_none());
    }

    #[tokio::test]
    async fn error_object_is_rejection() {
        let mut resp = page(vec![]);
        resp.result = None;
        resp.error = Some(JsonRpcError {
            code: -32602,
            message: "Invalid params".into(),
            data: None,
        });
        let client = DasClient::new(transport(vec![resp]));
        let err = client
            .query_group(&GroupQuery::collection("COLL"), 1, 10)
            .await
            .unwrap_err();
        assert!(matches!(err, IndexError::Rejected(ref m) if m.contains("-32602")));
    }

    #[tokio::test]
    async fn paginates_until_empty_page() {
        let t = transport(vec![
            page(vec![asset("A1", "O1", false), asset("A2", "O2", false)]),
            page(vec![asset("A3", "O3", true)]),
            page(vec![]),
        ]);
        let assets = Paginator::new(DasClient::new(t.clone()))
            .page_size(2)
            .fetch_all(&GroupQuery::collection("COLL"))
            .await
            .unwrap();
        let ids: Vec<_> = assets.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, ["A1", "A2", "A3"]);
        assert_eq!(t.seen.lock().unwrap().len(), 3);

        let items = metadata_update_items(&assets);
        assert_eq!(
            items,
            vec![
                WorkItem::update_metadata("A1", "O1"),
                WorkItem::update_metadata("A2", "O2"),
            ]
        );
    }

    #[tokio::test]
    async fn transport_failure_aborts_scan() {
        let t = transport(vec![page(vec![asset("A1", "O1", false)])]);
        let err = Paginator::new(DasClient::new(t))
            .fetch_all(&GroupQuery::collection("COLL"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PaginationError::Service {
                page: 2,
                source: IndexError::Transport(_)
            }
        ));
    }
}
