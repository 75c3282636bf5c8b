use crate::{
  building_block::{
    elgamal::{Ciphertext, DiscreteLogCrypto, PublicKey},
    gate::Gate,
    gate_type::GateType,
    ot::arithmetic_progression::{ApReceiver, ApSender},
    output_decoding_table::OutputDecodingTable,
    util::get_32_byte_rng,
    wire_label::WireLabel,
    wires::{catalogue_index, Wires},
  },
  config::SessionConfig,
  error::{Error, Result},
  protocols::network::{Network, PartyId, UnicastDest, UnicastId},
};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/*
  Circuit:
       x   y
       (AND)
         w    z
         (XOR)
           out

  The garbler holds x, the evaluator holds y and z. Each of the evaluator's
  labels travels by its own 1-of-2 transfer over that wire's two labels.
*/

const GARBLED_CIRCUIT: UnicastId = UnicastId(1);
const GARBLER_LABEL: UnicastId = UnicastId(2);
const OT_KEYS: UnicastId = UnicastId(3);
const OT_CIPHERTEXTS: UnicastId = UnicastId(4);

// wire indices the evaluator needs to find its way around the circuit
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CircuitLayout {
  pub x: usize,
  pub y: usize,
  pub z: usize,
  pub w: usize,
}

impl CircuitLayout {
  pub fn evaluator_wires(&self) -> [usize; 2] {
    [self.y, self.z]
  }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GarbledCircuit {
  pub and_gate: Gate,
  pub output_table: OutputDecodingTable,
  pub layout: CircuitLayout,
}

fn dest(id: UnicastId, from: PartyId) -> UnicastDest {
  UnicastDest::new(id, from, from.the_other())
}

pub struct Garbler {
  config: SessionConfig,
  network: Arc<Network>,
  x: bool,
}

impl Garbler {
  pub fn new(config: SessionConfig, network: Arc<Network>, x: bool) -> Self {
    Self {
      config,
      network,
      x,
    }
  }

  pub fn garble(&self) -> Result<(Wires, GarbledCircuit)> {
    let crypto = self.config.crypto();
    let mut rng = get_32_byte_rng();

    let mut wires = Wires::new();
    let x = wires.create(true, &mut OsRng);
    let y = wires.create(true, &mut OsRng);
    let z = wires.create(true, &mut OsRng);
    let w = wires.create(false, &mut OsRng);

    let and_gate = Gate::new(&crypto, 0, GateType::And, w, x, y, &wires, &mut rng)?;
    let output_table = OutputDecodingTable::new(
      &crypto,
      w,
      z,
      GateType::func(&GateType::Xor),
      &wires,
      &mut rng,
    )?;

    let circuit = GarbledCircuit {
      and_gate,
      output_table,
      layout: CircuitLayout { x, y, z, w },
    };
    Ok((wires, circuit))
  }

  pub async fn run(&self) -> Result<()> {
    self.config.validate()?;
    let crypto = self.config.crypto();
    let step = self.config.progression_step()?;
    let me = PartyId::Garbler;

    let (wires, circuit) = self.garble()?;
    let x_label = wires.get(circuit.layout.x)?.get_label(self.x).clone();
    self.network.send(&dest(GARBLED_CIRCUIT, me), &circuit).await?;
    self.network.send(&dest(GARBLER_LABEL, me), &x_label).await?;
    info!("garbled circuit sent");

    let families: Vec<Vec<PublicKey>> = self.network
      .receive(&dest(OT_KEYS, me.the_other()))
      .await?;
    let evaluator_wires = circuit.layout.evaluator_wires();
    if families.len() != evaluator_wires.len() {
      return Err(Error::KeyCountMismatch {
        expected: evaluator_wires.len(),
        actual: families.len(),
      });
    }
    debug!(num_families = families.len(), "received OT keys");

    // family k may only reach the two labels of evaluator wire k
    let ciphertexts = {
      let mut rng = get_32_byte_rng();
      let mut ciphertexts = Vec::with_capacity(families.len());
      for (&wire, keys) in evaluator_wires.iter().zip(&families) {
        let sender = ApSender::new(wires.catalogue_of(&[wire])?, step.clone());
        ciphertexts.push(sender.encrypt_messages(&crypto, keys, &mut rng)?);
      }
      ciphertexts
    };
    self.network.send(&dest(OT_CIPHERTEXTS, me), &ciphertexts).await?;
    info!("input labels transferred");
    Ok(())
  }
}

pub struct Evaluator {
  config: SessionConfig,
  network: Arc<Network>,
  y: bool,
  z: bool,
}

impl Evaluator {
  pub fn new(config: SessionConfig, network: Arc<Network>, y: bool, z: bool) -> Self {
    Self {
      config,
      network,
      y,
      z,
    }
  }

  fn receivers<E>(&self, crypto: &E, layout: &CircuitLayout) -> Result<Vec<ApReceiver>>
  where
    E: DiscreteLogCrypto + ?Sized,
  {
    let step = self.config.progression_step()?;
    let mut rng = get_32_byte_rng();

    [(layout.y, self.y), (layout.z, self.z)].iter()
      .map(|&(wire, bit)| {
        let choice = catalogue_index(&[wire], wire, bit)
          .ok_or(Error::UnknownWire(wire))?;
        ApReceiver::new(crypto, choice, 2, &step, &mut rng)
      })
      .collect()
  }

  pub async fn run(&self) -> Result<bool> {
    self.config.validate()?;
    let crypto = self.config.crypto();
    let me = PartyId::Evaluator;

    let circuit: GarbledCircuit = self.network
      .receive(&dest(GARBLED_CIRCUIT, me.the_other()))
      .await?;
    let x_label: WireLabel = self.network
      .receive(&dest(GARBLER_LABEL, me.the_other()))
      .await?;
    let layout = &circuit.layout;
    if circuit.and_gate.left != layout.x {
      return Err(Error::UnknownWire(circuit.and_gate.left));
    }
    if circuit.and_gate.right != layout.y {
      return Err(Error::UnknownWire(circuit.and_gate.right));
    }

    let receivers = self.receivers(&crypto, layout)?;
    let families: Vec<Vec<PublicKey>> = receivers.iter()
      .map(|receiver| receiver.public_keys().to_vec())
      .collect();
    self.network.send(&dest(OT_KEYS, me), &families).await?;

    let ciphertexts: Vec<Vec<Ciphertext>> = self.network
      .receive(&dest(OT_CIPHERTEXTS, me.the_other()))
      .await?;
    if ciphertexts.len() != receivers.len() {
      return Err(Error::KeyCountMismatch {
        expected: receivers.len(),
        actual: ciphertexts.len(),
      });
    }

    let labels = receivers.iter()
      .zip(&ciphertexts)
      .map(|(receiver, cs)| WireLabel::from_decrypted(&receiver.decrypt(&crypto, cs)?))
      .collect::<Result<Vec<WireLabel>>>()?;
    let (y_label, z_label) = (&labels[0], &labels[1]);
    debug!("input labels received");

    let w_label = circuit.and_gate.evaluate(&crypto, &x_label, y_label)?;
    let out = circuit.output_table.decode(&crypto, w_label.as_bytes(), z_label.as_bytes())?;
    info!(out, "circuit evaluated");
    Ok(out)
  }
}

/// Runs both parties to completion and returns the evaluator's output.
pub async fn run(config: &SessionConfig, x: bool, y: bool, z: bool) -> Result<bool> {
  config.validate()?;
  let network = Arc::new(Network::new());
  let garbler = Garbler::new(config.clone(), Arc::clone(&network), x);
  let evaluator = Evaluator::new(config.clone(), network, y, z);

  let ((), out) = futures::try_join!(garbler.run(), evaluator.run())?;
  Ok(out)
}
