//! Production station snapshot model.

use serde::{Deserialize, Serialize};

/// Kind of production station.
///
/// The five built-in types form the canonical garment flow
/// (cutting → printing → sewing → QC → finishing).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StationType {
    Cutting,
    Printing,
    Sewing,
    Qc,
    Finishing,
    /// Site-specific station type (embroidery, packing, ...).
    Custom(String),
}

/// Point-in-time performance metrics for one station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationMetrics {
    pub station_id: String,
    pub station_name: String,
    pub station_type: StationType,
    /// Units per hour currently achieved.
    pub current_throughput: f64,
    /// Units per hour the station is rated for.
    pub expected_throughput: f64,
    /// Units waiting to be processed.
    pub queue_length: u32,
    pub avg_wait_time_minutes: f64,
    /// 0-100 %.
    pub utilization_rate: f64,
    /// 0-100 %.
    pub defect_rate: f64,
    /// Operators rostered to the station.
    pub operator_count: u32,
    /// Operators actually present.
    pub active_operators: u32,
}

impl StationMetrics {
    /// Creates a healthy, idle-queue snapshot running at its rated throughput.
    pub fn new(
        station_id: impl Into<String>,
        station_name: impl Into<String>,
        station_type: StationType,
    ) -> Self {
        Self {
            station_id: station_id.into(),
            station_name: station_name.into(),
            station_type,
            current_throughput: 100.0,
            expected_throughput: 100.0,
            queue_length: 0,
            avg_wait_time_minutes: 0.0,
            utilization_rate: 80.0,
            defect_rate: 0.0,
            operator_count: 0,
            active_operators: 0,
        }
    }

    /// Sets current and expected throughput.
    pub fn with_throughput(mut self, current: f64, expected: f64) -> Self {
        self.current_throughput = current;
        self.expected_throughput = expected;
        self
    }

    /// Sets the queue length.
    pub fn with_queue(mut self, queue_length: u32) -> Self {
        self.queue_length = queue_length;
        self
    }

    /// Sets the average wait time.
    pub fn with_wait_minutes(mut self, minutes: f64) -> Self {
        self.avg_wait_time_minutes = minutes;
        self
    }

    /// Sets the utilization rate.
    pub fn with_utilization(mut self, percent: f64) -> Self {
        self.utilization_rate = percent;
        self
    }

    /// Sets the defect rate.
    pub fn with_defect_rate(mut self, percent: f64) -> Self {
        self.defect_rate = percent;
        self
    }

    /// Sets rostered and present operators.
    pub fn with_operators(mut self, rostered: u32, active: u32) -> Self {
        self.operator_count = rostered;
        self.active_operators = active;
        self
    }

    /// Rostered operators who are not present.
    pub fn operator_shortage(&self) -> u32 {
        self.operator_count.saturating_sub(self.active_operators)
    }

    /// Throughput shortfall versus rating, in percent.
    ///
    /// Negative when the station outperforms its rating; 0 when the rating is 0.
    pub fn throughput_loss_percent(&self) -> f64 {
        if self.expected_throughput == 0.0 {
            return 0.0;
        }
        (self.expected_throughput - self.current_throughput) / self.expected_throughput * 100.0
    }
}
