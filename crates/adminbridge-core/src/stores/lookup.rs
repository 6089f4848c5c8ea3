//! Reference-dictionary lookup table.

use std::sync::Arc;

use adminbridge_storage::keys;
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::DictApi;
use crate::client::ApiClient;
use crate::error::{ClientError, Result};
use crate::session::{Session, SessionBound};
use crate::stores::{Loader, SessionCache};

/// Dictionary-type records in server order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LookupDictionary(pub Vec<Value>);

impl LookupDictionary {
    /// Accept a bare array or a paginated `{ items, total }` payload.
    pub fn from_payload(data: Value) -> Result<Self> {
        match data {
            Value::Array(records) => Ok(Self(records)),
            Value::Object(mut map) => match map.remove("items") {
                Some(Value::Array(records)) => Ok(Self(records)),
                _ => Err(ClientError::InvalidFormat(
                    "Dictionary payload has no items array".to_string(),
                )),
            },
            Value::Null => Ok(Self::default()),
            other => Err(ClientError::InvalidFormat(format!(
                "Unexpected dictionary payload: {}",
                other
            ))),
        }
    }

    pub fn records(&self) -> &[Value] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Record whose `dict_type` matches.
    pub fn find_by_type(&self, dict_type: &str) -> Option<&Value> {
        self.0
            .iter()
            .find(|record| record.get("dict_type").and_then(Value::as_str) == Some(dict_type))
    }
}

pub struct LookupDictionaryStore {
    cache: SessionCache<LookupDictionary>,
}

impl LookupDictionaryStore {
    pub fn new(client: ApiClient, session: Session) -> Arc<Self> {
        let loader: Loader<LookupDictionary> = Arc::new(move || {
            let client = client.clone();
            async move {
                let response = client.invoke(DictApi::type_list_all()).await?;
                LookupDictionary::from_payload(response.into_data())
            }
            .boxed()
        });

        let store = Arc::new(Self {
            cache: SessionCache::new(keys::LOOKUP_DICT, session.clone(), loader),
        });
        session.bind(store.clone());
        store
    }

    pub async fn ensure(&self) -> Result<LookupDictionary> {
        self.cache.ensure().await
    }

    pub fn get(&self) -> Result<Option<LookupDictionary>> {
        self.cache.get()
    }
}

impl SessionBound for LookupDictionaryStore {
    fn name(&self) -> &'static str {
        "lookup_dictionary"
    }

    fn reset(&self) {
        self.cache.reset();
    }
}
