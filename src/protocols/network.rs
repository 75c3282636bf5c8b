use crate::error::{Error, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use tokio::sync::{
  Mutex,
  Notify,
};
use tracing::trace;

#[derive(Eq, PartialEq, Hash, Clone, Copy, Debug)]
pub struct UnicastId(pub u8);

#[derive(Eq, PartialEq, Hash, Clone, Copy, Debug)]
pub enum PartyId {
  Garbler,
  Evaluator,
}

impl PartyId {
  pub fn the_other(&self) -> PartyId {
    match self {
      PartyId::Garbler => PartyId::Evaluator,
      PartyId::Evaluator => PartyId::Garbler,
    }
  }
}

#[derive(Eq, PartialEq, Hash, Clone, Debug)]
pub struct UnicastDest {
  id: UnicastId,
  from: PartyId,
  to: PartyId,
}

impl UnicastDest {
  pub fn new(id: UnicastId, from: PartyId, to: PartyId) -> Self {
    Self {
      id,
      from,
      to,
    }
  }
}

type ValueType = Vec<u8>;

/// In-memory mailbox between the two parties. Every destination slot holds
/// at most one undelivered message.
#[derive(Default)]
pub struct Network {
  unicasts: Mutex<HashMap<UnicastDest, ValueType>>,
  data_added: Notify,
}

impl Network {
  pub fn new() -> Self {
    Self::default()
  }

  pub async fn unicast(&self, dest: &UnicastDest, value: ValueType) -> Result<()> {
    let mut unicasts = self.unicasts.lock().await;
    if unicasts.contains_key(dest) {
      return Err(Error::Network(
        format!("multiple unicasts found for destination {:?}", dest),
      ));
    }
    trace!(?dest, len = value.len(), "unicast");
    unicasts.insert(dest.clone(), value);
    drop(unicasts);

    self.data_added.notify_waiters();
    Ok(())
  }

  pub async fn receive_unicast(&self, dest: &UnicastDest) -> ValueType {
    loop {
      // register interest before checking so a notification in between is kept
      let notified = self.data_added.notified();
      tokio::pin!(notified);
      notified.as_mut().enable();

      let mut unicasts = self.unicasts.lock().await;
      if let Some(value) = unicasts.remove(dest) {
        return value;
      }
      drop(unicasts);
      notified.await;
    }
  }

  pub async fn send<T: Serialize>(&self, dest: &UnicastDest, value: &T) -> Result<()> {
    let bytes = bincode::serialize(value)?;
    self.unicast(dest, bytes).await
  }

  pub async fn receive<T: DeserializeOwned>(&self, dest: &UnicastDest) -> Result<T> {
    let bytes = self.receive_unicast(dest).await;
    Ok(bincode::deserialize(&bytes)?)
  }
}
