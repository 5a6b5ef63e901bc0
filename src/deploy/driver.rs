//! Deployment driver.
//!
//! Owns the chain client and the results of earlier steps. Wallets are
//! passed to every signing step; there is no implicit signer.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

use crate::blockchain::{ChainClient, CodeId, Coin, Fee, TxResult, Wallet, WasmMsg};
use crate::deploy::artifact::Artifact;
use crate::deploy::error::{DeployError, DeployResult};
use crate::deploy::msg::{ExecuteMsg, InstantiateMsg, QueryMsg};

/// A live contract created by [`Deployer::instantiate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractInstance {
    pub address: String,
    pub code_id: CodeId,
    pub init: InstantiateMsg,
}

/// Drives the store → instantiate → execute/query sequence.
pub struct Deployer<C> {
    client: C,
    fee: Fee,
    label: String,
    instance: Option<ContractInstance>,
}

impl<C: ChainClient> Deployer<C> {
    /// Create a driver that attaches `fee` to each transaction and labels
    /// instances with `label`.
    pub fn new(client: C, fee: Fee, label: impl Into<String>) -> Self {
        Self {
            client,
            fee,
            label: label.into(),
            instance: None,
        }
    }

    /// Bind to a contract instantiated in an earlier run.
    pub fn attach(&mut self, instance: ContractInstance) {
        tracing::info!(
            contract = %instance.address,
            code_id = %instance.code_id,
            "Attached to contract"
        );
        self.instance = Some(instance);
    }

    /// The contract bound by `instantiate` or `attach`, if any.
    pub fn instance(&self) -> Option<&ContractInstance> {
        self.instance.as_ref()
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Upload `<dir>/<name>.wasm` and return the assigned code id.
    pub async fn store_artifact(
        &self,
        signer: &Wallet,
        dir: &Path,
        name: &str,
    ) -> DeployResult<CodeId> {
        let artifact = Artifact::load(dir, name).await?;
        tracing::info!(
            artifact = %artifact.path.display(),
            size = artifact.wasm.len(),
            checksum = %artifact.checksum(),
            "Storing contract code"
        );

        let msg = WasmMsg::StoreCode {
            sender: signer.address().to_string(),
            wasm_byte_code: artifact.wasm,
        };
        let result = self
            .client
            .broadcast(signer, vec![msg], &self.fee)
            .await
            .map_err(DeployError::Broadcast)?;

        let code_id = result.code_id().ok_or_else(|| DeployError::MissingAttribute {
            txhash: result.txhash.clone(),
            event: "store_code",
            key: "code_id",
        })?;

        tracing::info!(code_id = %code_id, txhash = %result.txhash, "Contract code stored");
        Ok(code_id)
    }

    /// Instantiate stored code. The signer becomes both sender and admin.
    pub async fn instantiate(
        &mut self,
        signer: &Wallet,
        code_id: CodeId,
        init: &InstantiateMsg,
    ) -> DeployResult<ContractInstance> {
        let msg = WasmMsg::Instantiate {
            sender: signer.address().to_string(),
            admin: Some(signer.address().to_string()),
            code_id,
            label: self.label.clone(),
            msg: serde_json::to_vec(init)?,
            funds: Vec::new(),
        };
        let result = self
            .client
            .broadcast(signer, vec![msg], &self.fee)
            .await
            .map_err(DeployError::Instantiation)?;

        let address = result
            .contract_address()
            .ok_or_else(|| DeployError::MissingAttribute {
                txhash: result.txhash.clone(),
                event: "instantiate",
                key: "_contract_address",
            })?
            .to_string();

        let instance = ContractInstance {
            address,
            code_id,
            init: init.clone(),
        };
        tracing::info!(
            contract = %instance.address,
            code_id = %code_id,
            txhash = %result.txhash,
            "Contract instantiated"
        );

        self.instance = Some(instance.clone());
        Ok(instance)
    }

    /// Execute a contract call signed (and sent) by `signer`.
    pub async fn execute(&self, signer: &Wallet, msg: &ExecuteMsg) -> DeployResult<TxResult> {
        let contract = self.contract_address()?;
        let wasm_msg = WasmMsg::Execute {
            sender: signer.address().to_string(),
            contract: contract.to_string(),
            msg: serde_json::to_vec(msg)?,
            funds: Vec::new(),
        };

        let result = self
            .client
            .broadcast(signer, vec![wasm_msg], &self.fee)
            .await
            .map_err(DeployError::Execution)?;

        tracing::info!(
            action = msg.action(),
            contract = %contract,
            txhash = %result.txhash,
            "Contract executed"
        );
        Ok(result)
    }

    /// Query the contract and decode the response.
    pub async fn query<R: DeserializeOwned>(&self, msg: &QueryMsg) -> DeployResult<R> {
        let value = self.query_raw(msg).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Query the contract and return the undecoded JSON response.
    pub async fn query_raw(&self, msg: &QueryMsg) -> DeployResult<serde_json::Value> {
        let contract = self.contract_address()?;
        let query = serde_json::to_value(msg)?;

        tracing::debug!(contract = %contract, query = %query, "Querying contract");
        self.client
            .query_contract(contract, &query)
            .await
            .map_err(DeployError::Query)
    }

    /// Bank balances of `address`.
    pub async fn balance(&self, address: &str) -> DeployResult<Vec<Coin>> {
        Ok(self.client.balance(address).await?)
    }

    fn contract_address(&self) -> DeployResult<&str> {
        self.instance
            .as_ref()
            .map(|instance| instance.address.as_str())
            .ok_or(DeployError::NotInstantiated)
    }
}
