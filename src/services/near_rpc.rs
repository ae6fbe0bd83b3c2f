use async_trait::async_trait;
use log::{error, info, warn};
use near_jsonrpc_client::errors::{JsonRpcError, JsonRpcServerError};
use near_jsonrpc_client::{methods, JsonRpcClient};
use near_jsonrpc_primitives::types::query::{QueryResponseKind, RpcQueryError};
use near_primitives::types::{
    AccountId, Balance, BlockId, BlockReference, EpochReference, Finality, FunctionArgs,
};
use near_primitives::views::QueryRequest;

use crate::error::{RewardsError, RewardsResult};
use crate::models::{BlockInfo, EpochInfo, PoolAccount};
use crate::services::provider::ChainProvider;

/// JSON RPC client over an immutable ordered list of endpoints. Each logical
/// query makes a single pass through the list; the first endpoint that
/// answers wins.
pub struct NearRpcClient {
    clients: Vec<(String, JsonRpcClient)>,
}

/// How a query failed: the node answered with a structured error (a
/// definitive response, not to be confused with an outage), or no endpoint
/// could serve the call at all.
enum CallFailure<E> {
    Handler(E),
    Unavailable(String),
}

impl<E: std::fmt::Debug> CallFailure<E> {
    fn into_unavailable(self) -> RewardsError {
        match self {
            CallFailure::Handler(err) => RewardsError::RpcUnavailable(format!("{:?}", err)),
            CallFailure::Unavailable(message) => RewardsError::RpcUnavailable(message),
        }
    }
}

fn block_reference(block_height: Option<u64>) -> BlockReference {
    match block_height {
        Some(height) => BlockReference::BlockId(BlockId::Height(height)),
        None => BlockReference::Finality(Finality::Final),
    }
}

fn parse_account_id(account_id: &str) -> RewardsResult<AccountId> {
    account_id
        .parse()
        .map_err(|_| RewardsError::AccountNotFound(account_id.to_string()))
}

fn parse_balance_response(method: &str, bytes: &[u8]) -> RewardsResult<Balance> {
    let text: String = serde_json::from_slice(bytes).map_err(|e| RewardsError::ParseFailure {
        field: method.to_string(),
        value: e.to_string(),
    })?;
    match text.parse::<Balance>() {
        Ok(value) => Ok(value),
        Err(_) => Err(RewardsError::ParseFailure {
            field: method.to_string(),
            value: text,
        }),
    }
}

impl NearRpcClient {
    pub fn connect(endpoints: &[String]) -> Self {
        info!("Connecting to NEAR RPC endpoints: {:?}", endpoints);
        let clients = endpoints
            .iter()
            .map(|url| (url.clone(), JsonRpcClient::connect(url)))
            .collect();
        Self { clients }
    }

    /// Attempt the request on each endpoint in order. Requests are consumed
    /// by the client, so callers hand over a factory instead of a value. A
    /// handler error short-circuits: the node has answered, and asking
    /// another node would only repeat the answer.
    async fn query_rpc<M, F>(&self, make_request: F) -> Result<M::Response, CallFailure<M::Error>>
    where
        M: methods::RpcMethod,
        F: Fn() -> M,
        M::Error: std::fmt::Debug,
    {
        let mut last_failure = String::from("no RPC endpoints configured");
        for (url, client) in &self.clients {
            info!("Querying {} via {}", std::any::type_name::<M>(), url);
            match client.call(make_request()).await {
                Ok(response) => {
                    info!("RPC query successful: {}", std::any::type_name::<M>());
                    return Ok(response);
                }
                Err(JsonRpcError::ServerError(JsonRpcServerError::HandlerError(err))) => {
                    info!(
                        "{} answered {} with a handler error: {:?}",
                        url,
                        std::any::type_name::<M>(),
                        err
                    );
                    return Err(CallFailure::Handler(err));
                }
                Err(err) => {
                    warn!(
                        "Endpoint {} failed for {}: {:?}",
                        url,
                        std::any::type_name::<M>(),
                        err
                    );
                    last_failure = format!("{:?}", err);
                }
            }
        }
        error!(
            "All RPC endpoints failed for {}",
            std::any::type_name::<M>()
        );
        Err(CallFailure::Unavailable(last_failure))
    }

    async fn call_view_function(
        &self,
        contract_id: &AccountId,
        method_name: &str,
        args: serde_json::Value,
        reference: BlockReference,
    ) -> Result<Vec<u8>, CallFailure<RpcQueryError>> {
        let response = self
            .query_rpc(|| methods::query::RpcQueryRequest {
                block_reference: reference.clone(),
                request: QueryRequest::CallFunction {
                    account_id: contract_id.clone(),
                    method_name: method_name.to_string(),
                    args: FunctionArgs::from(args.to_string().into_bytes()),
                },
            })
            .await?;

        match response.kind {
            QueryResponseKind::CallResult(result) => Ok(result.result),
            _ => Err(CallFailure::Unavailable(
                "unexpected query response kind".to_string(),
            )),
        }
    }
}

#[async_trait]
impl ChainProvider for NearRpcClient {
    async fn get_native_balance(
        &self,
        account_id: &str,
        block_height: Option<u64>,
    ) -> RewardsResult<Balance> {
        let account = parse_account_id(account_id)?;
        let reference = block_reference(block_height);
        let response = self
            .query_rpc(|| methods::query::RpcQueryRequest {
                block_reference: reference.clone(),
                request: QueryRequest::ViewAccount {
                    account_id: account.clone(),
                },
            })
            .await;

        match response {
            Ok(response) => match response.kind {
                QueryResponseKind::ViewAccount(view) => Ok(view.amount),
                _ => Err(RewardsError::RpcUnavailable(
                    "unexpected query response kind".to_string(),
                )),
            },
            Err(CallFailure::Handler(RpcQueryError::UnknownAccount { .. })) => {
                Err(RewardsError::AccountNotFound(account_id.to_string()))
            }
            Err(failure) => Err(failure.into_unavailable()),
        }
    }

    async fn is_contract(&self, account_id: &str) -> RewardsResult<bool> {
        let account = parse_account_id(account_id)?;
        let response = self
            .query_rpc(|| methods::query::RpcQueryRequest {
                block_reference: BlockReference::Finality(Finality::Final),
                request: QueryRequest::ViewCode {
                    account_id: account.clone(),
                },
            })
            .await;

        match response {
            Ok(_) => Ok(true),
            Err(CallFailure::Handler(RpcQueryError::NoContractCode { .. })) => Ok(false),
            Err(CallFailure::Handler(RpcQueryError::UnknownAccount { .. })) => {
                Err(RewardsError::AccountNotFound(account_id.to_string()))
            }
            Err(failure) => Err(failure.into_unavailable()),
        }
    }

    async fn get_validators(&self) -> RewardsResult<EpochInfo> {
        let info = self
            .query_rpc(|| methods::validators::RpcValidatorRequest {
                epoch_reference: EpochReference::Latest,
            })
            .await
            .map_err(CallFailure::into_unavailable)?;

        Ok(EpochInfo {
            epoch_start_height: info.epoch_start_height,
            epoch_height: info.epoch_height,
        })
    }

    async fn get_final_block(&self) -> RewardsResult<BlockInfo> {
        let block = self
            .query_rpc(|| methods::block::RpcBlockRequest {
                block_reference: BlockReference::Finality(Finality::Final),
            })
            .await
            .map_err(CallFailure::into_unavailable)?;

        Ok(BlockInfo::from_header(
            block.header.height,
            block.header.timestamp,
        ))
    }

    async fn get_account_in_pool(
        &self,
        account_id: &str,
        pool_id: &str,
        block_height: Option<u64>,
    ) -> RewardsResult<Option<PoolAccount>> {
        let pool = parse_account_id(pool_id)?;
        let args = serde_json::json!({ "account_id": account_id });
        let result = self
            .call_view_function(&pool, "get_account", args, block_reference(block_height))
            .await;

        match result {
            Ok(bytes) => {
                let record: Option<PoolAccount> =
                    serde_json::from_slice(&bytes).map_err(|e| RewardsError::ParseFailure {
                        field: "get_account".to_string(),
                        value: e.to_string(),
                    })?;
                Ok(record)
            }
            Err(CallFailure::Handler(
                RpcQueryError::NoContractCode { .. } | RpcQueryError::ContractExecutionError { .. },
            )) => Ok(None),
            Err(failure) => Err(failure.into_unavailable()),
        }
    }

    async fn get_staking_pool_account_id(
        &self,
        account_id: &str,
    ) -> RewardsResult<Option<String>> {
        let account = parse_account_id(account_id)?;
        let result = self
            .call_view_function(
                &account,
                "get_staking_pool_account_id",
                serde_json::json!({}),
                BlockReference::Finality(Finality::Final),
            )
            .await;

        match result {
            Ok(bytes) => {
                let pool: Option<String> =
                    serde_json::from_slice(&bytes).map_err(|e| RewardsError::ParseFailure {
                        field: "get_staking_pool_account_id".to_string(),
                        value: e.to_string(),
                    })?;
                Ok(pool.filter(|pool_id| !pool_id.is_empty()))
            }
            Err(CallFailure::Handler(
                RpcQueryError::NoContractCode { .. } | RpcQueryError::ContractExecutionError { .. },
            )) => Ok(None),
            Err(failure) => Err(failure.into_unavailable()),
        }
    }

    async fn get_locked_amount(&self, account_id: &str) -> RewardsResult<Balance> {
        let account = parse_account_id(account_id)?;
        let result = self
            .call_view_function(
                &account,
                "get_locked_amount",
                serde_json::json!({}),
                BlockReference::Finality(Finality::Final),
            )
            .await;

        match result {
            Ok(bytes) => parse_balance_response("get_locked_amount", &bytes),
            Err(CallFailure::Handler(
                RpcQueryError::NoContractCode { .. } | RpcQueryError::ContractExecutionError { .. },
            )) => Err(RewardsError::NotALockupContract(account_id.to_string())),
            Err(failure) => Err(failure.into_unavailable()),
        }
    }

    async fn get_liquid_owners_balance(&self, account_id: &str) -> RewardsResult<Balance> {
        let account = parse_account_id(account_id)?;
        let result = self
            .call_view_function(
                &account,
                "get_liquid_owners_balance",
                serde_json::json!({}),
                BlockReference::Finality(Finality::Final),
            )
            .await;

        match result {
            Ok(bytes) => parse_balance_response("get_liquid_owners_balance", &bytes),
            Err(CallFailure::Handler(
                RpcQueryError::NoContractCode { .. } | RpcQueryError::ContractExecutionError { .. },
            )) => Err(RewardsError::NotALockupContract(account_id.to_string())),
            Err(failure) => Err(failure.into_unavailable()),
        }
    }
}
