//! Proves knowledge of `x1, x2` with `(x1 - 8)^2 + (x2 - 3)^3 = 17` using
//! Groth16 over BN254, then writes the verification key and proof to disk.
//!
//! Run with: `RUST_LOG=info cargo run --release`
//! Output paths default to `build/vk_data` and `build/proof_data`; override
//! them with `R1CS_VK_PATH` and `R1CS_PROOF_PATH`.
use ff::PrimeField;
use halo2curves::bn256::Fr;
use num_bigint::BigUint;
use r1cs_snark::{
  circuit::SumOfPowersCircuit,
  errors::R1CSError,
  pipeline::{self, PipelineConfig},
  provider::Groth16Backend,
  traits::snark::SnarkBackend,
};
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

fn to_decimal<F: PrimeField>(f: &F) -> String {
  BigUint::from_bytes_le(f.to_repr().as_ref()).to_string()
}

fn format_input<F: PrimeField>(values: &[F]) -> String {
  let values = values.iter().map(to_decimal).collect::<Vec<_>>();
  format!("{} [{}]", values.len(), values.join(", "))
}

fn run() -> Result<(), R1CSError> {
  let backend = Groth16Backend::init()?;
  let config = PipelineConfig::from_env();

  let circuit = SumOfPowersCircuit::<Fr>::new(11, 5);
  let (cs, witness) = pipeline::build(&circuit)?;
  let report = pipeline::run(&backend, &cs, &witness, &config)?;

  println!("Number of R1CS constraints: {}", report.num_constraints);
  println!("Primary (public) input: {}", format_input(&report.primary_input));
  println!(
    "Auxiliary (private) input: {}",
    format_input(&report.auxiliary_input)
  );
  println!("Verification status: {}", u8::from(report.verified));
  println!("Circuit digest: {}", hex::encode(report.digest));
  println!("Verification key written to {}", config.vk_path.display());
  println!("Proof written to {}", config.proof_path.display());
  Ok(())
}

fn main() -> ExitCode {
  tracing_subscriber::fmt()
    .with_target(false)
    .with_ansi(false)
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .init();

  match run() {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      error!(error = %e, "pipeline failed");
      eprintln!("error: {e}");
      ExitCode::FAILURE
    }
  }
}
