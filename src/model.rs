use std::path::Path;

use candle_core::{DType, Device, Module, Tensor};
use candle_nn::{linear, LSTMConfig, Linear, VarBuilder, LSTM, RNN};

use crate::error::{ArtifactError, ArtifactResult};
use crate::types::FEATURE_DIM;

pub const EMBEDDING_HIDDEN: usize = 256;
pub const GCN_HIDDEN: usize = 256;
pub const LSTM_HIDDEN: usize = 64;
pub const YIELD_OUTPUT: usize = 1;

fn var_builder(
    path: &Path,
    artifact: &'static str,
    device: &Device,
) -> ArtifactResult<VarBuilder<'static>> {
    unsafe { VarBuilder::from_mmaped_safetensors(&[path], DType::F32, device) }
        .map_err(|source| ArtifactError::Tensor { artifact, source })
}

/// Two-layer MLP mapping raw readings to the embedding the classifier was
/// fitted on. The embedding has one slot per crop class.
pub struct EmbeddingPredictor {
    fc1: Linear,
    fc2: Linear,
}

impl EmbeddingPredictor {
    pub const ARTIFACT: &'static str = "Embedding Predictor";

    pub fn new(
        vb: VarBuilder,
        in_dim: usize,
        hidden_dim: usize,
        out_dim: usize,
    ) -> candle_core::Result<Self> {
        Ok(Self {
            fc1: linear(in_dim, hidden_dim, vb.pp("fc1"))?,
            fc2: linear(hidden_dim, out_dim, vb.pp("fc2"))?,
        })
    }

    pub fn load(path: &Path, n_classes: usize, device: &Device) -> ArtifactResult<Self> {
        let vb = var_builder(path, Self::ARTIFACT, device)?;
        Self::new(vb, FEATURE_DIM, EMBEDDING_HIDDEN, n_classes)
            .map_err(|source| ArtifactError::Tensor { artifact: Self::ARTIFACT, source })
    }
}

impl Module for EmbeddingPredictor {
    fn forward(&self, xs: &Tensor) -> candle_core::Result<Tensor> {
        let hidden = self.fc1.forward(xs)?.relu()?;
        self.fc2.forward(&hidden)
    }
}

/// Single-layer LSTM whose last hidden state feeds a linear head.
pub struct LstmYieldPredictor {
    lstm: LSTM,
    fc: Linear,
}

impl LstmYieldPredictor {
    pub const ARTIFACT: &'static str = "LSTM model";

    pub fn new(
        vb: VarBuilder,
        in_dim: usize,
        hidden_dim: usize,
        out_dim: usize,
    ) -> candle_core::Result<Self> {
        Ok(Self {
            lstm: candle_nn::lstm(in_dim, hidden_dim, LSTMConfig::default(), vb.pp("lstm"))?,
            fc: linear(hidden_dim, out_dim, vb.pp("fc"))?,
        })
    }

    pub fn load(path: &Path, device: &Device) -> ArtifactResult<Self> {
        let vb = var_builder(path, Self::ARTIFACT, device)?;
        Self::new(vb, FEATURE_DIM, LSTM_HIDDEN, YIELD_OUTPUT)
            .map_err(|source| ArtifactError::Tensor { artifact: Self::ARTIFACT, source })
    }
}

impl Module for LstmYieldPredictor {
    /// `xs` is `(batch, seq_len, features)`; returns `(batch, out_dim)`.
    fn forward(&self, xs: &Tensor) -> candle_core::Result<Tensor> {
        let states = self.lstm.seq(xs)?;
        let last = states
            .last()
            .ok_or_else(|| candle_core::Error::Msg("LSTM input has no time steps".into()))?;
        self.fc.forward(last.h())
    }
}

/// Graph convolution: `A_norm · X · Wᵀ + b`, with `A_norm` from
/// [`normalized_adjacency`].
pub struct GcnConv {
    weight: Tensor,
    bias: Tensor,
}

impl GcnConv {
    pub fn new(vb: VarBuilder, in_dim: usize, out_dim: usize) -> candle_core::Result<Self> {
        Ok(Self {
            weight: vb.get((out_dim, in_dim), "lin.weight")?,
            bias: vb.get(out_dim, "bias")?,
        })
    }

    pub fn forward(&self, xs: &Tensor, adj: &Tensor) -> candle_core::Result<Tensor> {
        let projected = xs.matmul(&self.weight.t()?)?;
        adj.matmul(&projected)?.broadcast_add(&self.bias)
    }
}

/// Dense symmetric-normalized adjacency `D^-1/2 (A + I) D^-1/2` for a graph
/// given as directed `(source, target)` edges. Duplicate edges count once.
pub fn normalized_adjacency(
    num_nodes: usize,
    edges: &[(usize, usize)],
    device: &Device,
) -> candle_core::Result<Tensor> {
    let mut adj = vec![0.0f32; num_nodes * num_nodes];
    for i in 0..num_nodes {
        adj[i * num_nodes + i] = 1.0;
    }
    for &(src, dst) in edges {
        if src >= num_nodes || dst >= num_nodes {
            return Err(candle_core::Error::Msg(format!(
                "edge ({src}, {dst}) out of range for {num_nodes} nodes"
            )));
        }
        // messages flow source -> target, so row = target
        adj[dst * num_nodes + src] = 1.0;
    }

    let inv_sqrt_deg: Vec<f32> = adj
        .chunks(num_nodes.max(1))
        .map(|row| row.iter().sum::<f32>().sqrt().recip())
        .collect();

    for i in 0..num_nodes {
        for j in 0..num_nodes {
            adj[i * num_nodes + j] *= inv_sqrt_deg[i] * inv_sqrt_deg[j];
        }
    }

    Tensor::from_vec(adj, (num_nodes, num_nodes), device)
}

/// Two-layer GCN over crop/field graphs. Loaded with the bundle; no endpoint
/// calls it yet.
pub struct Gcn {
    conv1: GcnConv,
    conv2: GcnConv,
}

impl Gcn {
    pub const ARTIFACT: &'static str = "GCN model";

    pub fn new(
        vb: VarBuilder,
        in_dim: usize,
        hidden_dim: usize,
        out_dim: usize,
    ) -> candle_core::Result<Self> {
        Ok(Self {
            conv1: GcnConv::new(vb.pp("conv1"), in_dim, hidden_dim)?,
            conv2: GcnConv::new(vb.pp("conv2"), hidden_dim, out_dim)?,
        })
    }

    pub fn load(path: &Path, n_classes: usize, device: &Device) -> ArtifactResult<Self> {
        let vb = var_builder(path, Self::ARTIFACT, device)?;
        Self::new(vb, FEATURE_DIM, GCN_HIDDEN, n_classes)
            .map_err(|source| ArtifactError::Tensor { artifact: Self::ARTIFACT, source })
    }

    /// `xs` is `(num_nodes, in_dim)`, `adj` from [`normalized_adjacency`].
    pub fn forward(&self, xs: &Tensor, adj: &Tensor) -> candle_core::Result<Tensor> {
        let hidden = self.conv1.forward(xs, adj)?.relu()?;
        self.conv2.forward(&hidden, adj)
    }
}
