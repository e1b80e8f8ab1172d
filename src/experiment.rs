use crate::bayes::categorical::CategoricalNB;
use crate::classifier::Classifier;
use crate::data::dataset::{Dataset, DEFAULT_LABEL};
use crate::data::domain::{AttributeDomain, AttributeDomains};
use crate::discretize::{discretize_dataset, DiscretizeParams, Strategy};
use crate::error::{ModelError, Result};
use crate::metrics::confusion::{ClassificationMetrics, ConfusionMatrix};
use crate::trees::classifier::Id3Classifier;
use crate::trees::params::TreeParams;
use std::fmt::{self, Display, Formatter};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// File name of the summary table inside the output directory.
pub const OVERVIEW_FILE: &str = "overview.csv";

/// The classifiers an experiment can build.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModelKind {
    NaiveBayes,
    Id3,
}

impl ModelKind {
    pub const ALL: [ModelKind; 2] = [ModelKind::NaiveBayes, ModelKind::Id3];

    pub fn name(&self) -> &'static str {
        match self {
            ModelKind::NaiveBayes => "NBC",
            ModelKind::Id3 => "ID3 tree",
        }
    }
}

impl Display for ModelKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Settings shared by every model an experiment builds.
#[derive(Clone, Debug)]
pub struct ExperimentConfig {
    label: String,
    discretize: DiscretizeParams,
    tree_params: TreeParams,
    strategies: Vec<Strategy>,
    models: Vec<ModelKind>,
    train_size: Option<f64>,
    seed: Option<u64>,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ExperimentConfig {
    pub fn new() -> Self {
        Self {
            label: DEFAULT_LABEL.to_string(),
            discretize: DiscretizeParams::default(),
            tree_params: TreeParams::default(),
            strategies: Strategy::ALL.to_vec(),
            models: ModelKind::ALL.to_vec(),
            train_size: None,
            seed: None,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label<S: Into<String>>(&mut self, label: S) {
        self.label = label.into().trim().to_lowercase();
    }

    pub fn bins(&self) -> usize {
        self.discretize.bins()
    }

    pub fn set_bins(&mut self, bins: usize) -> Result<()> {
        self.discretize.set_bins(bins)
    }

    pub fn min_gain(&self) -> f64 {
        self.tree_params.min_gain()
    }

    pub fn set_min_gain(&mut self, min_gain: f64) -> Result<()> {
        self.tree_params.set_min_gain(min_gain)
    }

    pub fn min_samples_split(&self) -> usize {
        self.tree_params.min_samples_split()
    }

    pub fn set_min_samples_split(&mut self, min_samples_split: usize) {
        self.tree_params.set_min_samples_split(min_samples_split);
    }

    pub fn strategies(&self) -> &[Strategy] {
        &self.strategies
    }

    pub fn set_strategies(&mut self, strategies: Vec<Strategy>) -> Result<()> {
        if strategies.is_empty() {
            return Err(ModelError::invalid_parameter(
                "At least one discretization strategy is required.",
            ));
        }
        self.strategies = strategies;
        Ok(())
    }

    pub fn models(&self) -> &[ModelKind] {
        &self.models
    }

    pub fn set_models(&mut self, models: Vec<ModelKind>) -> Result<()> {
        if models.is_empty() {
            return Err(ModelError::invalid_parameter("At least one model is required."));
        }
        self.models = models;
        Ok(())
    }

    pub fn train_size(&self) -> Option<f64> {
        self.train_size
    }

    /// Share of the training file kept for training when no test file is
    /// given; the rest becomes the test set.
    pub fn set_train_size(&mut self, train_size: f64) -> Result<()> {
        if !(train_size > 0.0 && train_size < 1.0) {
            return Err(ModelError::invalid_parameter(
                "Train size should be between 0.0 and 1.0, both exclusive.",
            ));
        }
        self.train_size = Some(train_size);
        Ok(())
    }

    pub fn set_seed(&mut self, seed: u64) {
        self.seed = Some(seed);
    }
}

/// Outcome of one model on one dataset.
#[derive(Clone, Debug)]
pub struct EvaluationRow {
    pub description: String,
    pub total: usize,
    pub correct: usize,
    pub confusion: ConfusionMatrix<String>,
}

impl EvaluationRow {
    pub fn errors(&self) -> usize {
        self.total - self.correct
    }

    pub fn error_percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.errors() as f64 / self.total as f64 * 100.0
    }
}

impl Display for EvaluationRow {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: total {}, correct {}, errors {}, error {:.2}%",
            self.description,
            self.total,
            self.correct,
            self.errors(),
            self.error_percent()
        )
    }
}

/// Trains every strategy and model combination and evaluates each one on
/// the processed training data, the raw training data and the test data.
#[derive(Clone, Debug)]
pub struct Experiment {
    config: ExperimentConfig,
    train: Dataset,
    test: Option<Dataset>,
    declared: AttributeDomains,
}

impl Experiment {
    pub fn new(config: ExperimentConfig, train: Dataset, test: Option<Dataset>) -> Result<Self> {
        if !train.is_not_empty() {
            return Err(ModelError::EmptyDataset);
        }
        let (train, test) = match (test, config.train_size()) {
            (None, Some(train_size)) => {
                let (train, test) = train.train_test_split(train_size, config.seed)?;
                if !train.is_not_empty() {
                    return Err(ModelError::invalid_parameter(
                        "Train size leaves no rows to train on.",
                    ));
                }
                info!(train = train.nrows(), test = test.nrows(), "split training data");
                (train, Some(test))
            }
            (test, _) => (train, test),
        };
        Ok(Self {
            config,
            train,
            test,
            declared: AttributeDomains::new(),
        })
    }

    /// Domains from a structure file; their values appear in every model's
    /// tables even when the training data lacks them.
    pub fn with_declared_domains(mut self, declared: AttributeDomains) -> Self {
        self.declared = declared;
        self
    }

    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    pub fn train(&self) -> &Dataset {
        &self.train
    }

    pub fn test(&self) -> Option<&Dataset> {
        self.test.as_ref()
    }

    pub fn run(&self) -> Result<Vec<EvaluationRow>> {
        let mut rows = Vec::new();

        for &strategy in self.config.strategies() {
            info!(%strategy, "pre-processing training data");
            let params = DiscretizeParams::with_strategy(strategy, self.config.bins())?;
            let (processed, binned) = discretize_dataset(&self.train, &params)?;
            let domains = Arc::new(self.shared_domains(binned));

            for &kind in self.config.models() {
                let description = format!("{} model, {} disc", kind, strategy);
                info!(model = %description, "building model");
                match kind {
                    ModelKind::NaiveBayes => {
                        let mut model = CategoricalNB::with_domains(domains.clone());
                        model.fit(&processed)?;
                        self.evaluate_all(&model, &description, &processed, &mut rows)?;
                    }
                    ModelKind::Id3 => {
                        let mut model = Id3Classifier::with_params(
                            Some(self.config.min_gain()),
                            Some(self.config.min_samples_split()),
                        )?;
                        model.set_domains(domains.clone());
                        model.fit(&processed)?;
                        self.evaluate_all(&model, &description, &processed, &mut rows)?;
                    }
                }
            }
        }

        Ok(rows)
    }

    fn shared_domains(&self, binned: AttributeDomains) -> AttributeDomains {
        let mut shared = self.declared.clone();
        for (name, domain) in binned.iter() {
            let is_binned = matches!(domain, AttributeDomain::Intervals(_));
            if is_binned || shared.get(name).is_none() {
                shared.insert(name.clone(), domain.clone());
            }
        }
        shared
    }

    fn evaluate_all<M>(
        &self,
        model: &M,
        description: &str,
        processed: &Dataset,
        rows: &mut Vec<EvaluationRow>,
    ) -> Result<()>
    where
        M: Classifier + ClassificationMetrics,
    {
        rows.push(evaluate(model, processed, format!("{}, processed data", description))?);
        rows.push(evaluate(model, &self.train, format!("{}, unprocessed data", description))?);
        if let Some(test) = &self.test {
            rows.push(evaluate(model, test, format!("{}, test data", description))?);
        }
        Ok(())
    }
}

/// Predicts every row of `dataset` and compares against its labels.
pub fn evaluate<M>(model: &M, dataset: &Dataset, description: String) -> Result<EvaluationRow>
where
    M: Classifier + ClassificationMetrics,
{
    let predictions = model.predict(dataset)?;
    let confusion = model.confusion_matrix(&dataset.y, &predictions)?;
    let correct = confusion.matrix.diagonal().sum();
    let row = EvaluationRow {
        description,
        total: dataset.nrows(),
        correct,
        confusion,
    };
    info!("{}", row);
    Ok(row)
}

/// Writes the summary table as CSV.
pub fn write_overview<W: io::Write>(rows: &[EvaluationRow], writer: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(["description", "total entries", "correct", "errors", "error %"])?;
    for row in rows {
        writer.write_record([
            row.description.clone(),
            row.total.to_string(),
            row.correct.to_string(),
            row.errors().to_string(),
            format!("{:.2}", row.error_percent()),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes [`OVERVIEW_FILE`] into `dir`, creating the directory if needed.
pub fn write_overview_file<P: AsRef<Path>>(rows: &[EvaluationRow], dir: P) -> Result<PathBuf> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    let path = dir.join(OVERVIEW_FILE);
    write_overview(rows, fs::File::create(&path)?)?;
    info!(path = %path.display(), "overview table written");
    Ok(path)
}
