//! Contract artifacts
//!
//! Loads compiled contract JSON (`abi` plus per-network `networks` map) and
//! exposes typed functions and events with their selectors.

use super::codec::{self, WORD};
use super::error::{AbiError, AbiResult};
use super::keccak256;
use super::types::{Address, AbiValue, ParamType};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// A compiled contract artifact
#[derive(Debug, Clone)]
pub struct ContractArtifact {
    pub contract_name: Option<String>,
    pub abi: Abi,
    /// Deployments keyed by network id
    pub networks: HashMap<String, Address>,
}

impl ContractArtifact {
    /// Load an artifact from a JSON file
    pub fn load(path: &Path) -> AbiResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| AbiError::ArtifactIo {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;
        Self::from_json(&content)
    }

    /// Parse an artifact from JSON text
    pub fn from_json(json: &str) -> AbiResult<Self> {
        let raw: RawArtifact = serde_json::from_str(json)?;
        let abi = Abi::from_entries(raw.abi)?;

        let mut networks = HashMap::new();
        for (network_id, deployment) in raw.networks {
            let Some(address) = deployment.address else {
                continue;
            };
            networks.insert(network_id, address.parse()?);
        }

        Ok(Self {
            contract_name: raw.contract_name,
            abi,
            networks,
        })
    }

    /// Deployed address on the given network, if any
    pub fn address_for(&self, network_id: &str) -> Option<Address> {
        self.networks.get(network_id).copied()
    }
}

/// Functions and events declared by a contract
#[derive(Debug, Clone, Default)]
pub struct Abi {
    pub functions: Vec<Function>,
    pub events: Vec<Event>,
}

impl Abi {
    fn from_entries(entries: Vec<RawEntry>) -> AbiResult<Self> {
        let mut abi = Abi::default();

        for entry in entries {
            match entry.kind.as_str() {
                "function" => abi.functions.push(Function {
                    name: entry.name.unwrap_or_default(),
                    inputs: Param::list(entry.inputs)?,
                    outputs: Param::list(entry.outputs)?,
                    state_mutability: entry.state_mutability,
                }),
                "event" => abi.events.push(Event {
                    name: entry.name.unwrap_or_default(),
                    inputs: entry
                        .inputs
                        .into_iter()
                        .map(|p| -> AbiResult<EventParam> {
                            Ok(EventParam {
                                indexed: p.indexed,
                                param: Param::from_raw(p)?,
                            })
                        })
                        .collect::<AbiResult<_>>()?,
                    anonymous: entry.anonymous,
                }),
                // constructor, fallback, receive, error: not called by this client
                _ => {}
            }
        }

        Ok(abi)
    }

    /// Look up a function by name
    pub fn function(&self, name: &str) -> AbiResult<&Function> {
        self.functions
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| AbiError::FunctionNotFound(name.to_string()))
    }

    /// Look up an event by name
    pub fn event(&self, name: &str) -> AbiResult<&Event> {
        self.events
            .iter()
            .find(|e| e.name == name)
            .ok_or_else(|| AbiError::EventNotFound(name.to_string()))
    }
}

/// A named, typed parameter
#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub kind: ParamType,
}

impl Param {
    fn from_raw(raw: RawParam) -> AbiResult<Self> {
        Ok(Self {
            name: raw.name,
            kind: ParamType::parse(&raw.kind)?,
        })
    }

    fn list(raw: Vec<RawParam>) -> AbiResult<Vec<Self>> {
        raw.into_iter().map(Self::from_raw).collect()
    }
}

/// A contract function
#[derive(Debug, Clone)]
pub struct Function {
    pub name: String,
    pub inputs: Vec<Param>,
    pub outputs: Vec<Param>,
    pub state_mutability: Option<String>,
}

impl Function {
    /// Canonical signature, e.g. `getEmployee(address)`
    pub fn signature(&self) -> String {
        signature(&self.name, self.inputs.iter().map(|p| &p.kind))
    }

    /// First four bytes of the Keccak-256 of the signature
    pub fn selector(&self) -> [u8; 4] {
        let hash = keccak256(self.signature().as_bytes());
        [hash[0], hash[1], hash[2], hash[3]]
    }

    /// Whether calling this function changes contract state
    pub fn is_mutating(&self) -> bool {
        !matches!(self.state_mutability.as_deref(), Some("view") | Some("pure"))
    }

    /// Selector followed by the encoded arguments
    pub fn encode_input(&self, args: &[AbiValue]) -> AbiResult<Vec<u8>> {
        let types: Vec<ParamType> = self.inputs.iter().map(|p| p.kind.clone()).collect();
        let mut data = self.selector().to_vec();
        data.extend(codec::encode(&types, args)?);
        Ok(data)
    }

    /// Decode the return data of a call
    pub fn decode_output(&self, data: &[u8]) -> AbiResult<Vec<AbiValue>> {
        let types: Vec<ParamType> = self.outputs.iter().map(|p| p.kind.clone()).collect();
        codec::decode(&types, data)
    }
}

/// An event parameter with its `indexed` flag
#[derive(Debug, Clone)]
pub struct EventParam {
    pub param: Param,
    pub indexed: bool,
}

/// A contract event
#[derive(Debug, Clone)]
pub struct Event {
    pub name: String,
    pub inputs: Vec<EventParam>,
    pub anonymous: bool,
}

impl Event {
    /// Canonical signature, e.g. `EmployeeAdded(address,string)`
    pub fn signature(&self) -> String {
        signature(&self.name, self.inputs.iter().map(|p| &p.param.kind))
    }

    /// Keccak-256 of the signature, emitted as the first topic
    pub fn topic(&self) -> [u8; WORD] {
        keccak256(self.signature().as_bytes())
    }

    /// Whether a log with these topics was emitted by this event
    pub fn matches(&self, topics: &[[u8; WORD]]) -> bool {
        !self.anonymous && topics.first() == Some(&self.topic())
    }

    /// Decode a log into values in declaration order
    ///
    /// Indexed static values come from the topics; indexed dynamic values are
    /// only available as their hash and are returned as 32 fixed bytes.
    pub fn decode_log(&self, topics: &[[u8; WORD]], data: &[u8]) -> AbiResult<Vec<AbiValue>> {
        let mut topic_iter = topics.iter().skip(if self.anonymous { 0 } else { 1 });

        let data_types: Vec<ParamType> = self
            .inputs
            .iter()
            .filter(|p| !p.indexed)
            .map(|p| p.param.kind.clone())
            .collect();
        let mut data_values = codec::decode(&data_types, data)?.into_iter();

        let mut values = Vec::with_capacity(self.inputs.len());
        for input in &self.inputs {
            if input.indexed {
                let topic = topic_iter.next().ok_or_else(|| {
                    AbiError::Malformed(format!("missing topic for {}", input.param.name))
                })?;
                if input.param.kind.is_dynamic() {
                    values.push(AbiValue::FixedBytes(topic.to_vec()));
                } else {
                    values.push(codec::decode_word(&input.param.kind, topic)?);
                }
            } else {
                let value = data_values.next().ok_or_else(|| {
                    AbiError::Malformed(format!("missing data for {}", input.param.name))
                })?;
                values.push(value);
            }
        }

        Ok(values)
    }
}

fn signature<'a>(name: &str, kinds: impl Iterator<Item = &'a ParamType>) -> String {
    let args: Vec<String> = kinds.map(|k| k.to_string()).collect();
    format!("{}({})", name, args.join(","))
}

// ============================================
// Raw JSON shapes
// ============================================

#[derive(Debug, Deserialize)]
struct RawArtifact {
    #[serde(rename = "contractName", default)]
    contract_name: Option<String>,
    abi: Vec<RawEntry>,
    #[serde(default)]
    networks: HashMap<String, RawDeployment>,
}

#[derive(Debug, Deserialize)]
struct RawDeployment {
    #[serde(default)]
    address: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    #[serde(rename = "type", default = "default_entry_type")]
    kind: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    inputs: Vec<RawParam>,
    #[serde(default)]
    outputs: Vec<RawParam>,
    #[serde(rename = "stateMutability", default)]
    state_mutability: Option<String>,
    #[serde(default)]
    anonymous: bool,
}

fn default_entry_type() -> String {
    "function".to_string()
}

#[derive(Debug, Deserialize)]
struct RawParam {
    #[serde(default)]
    name: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    indexed: bool,
}
