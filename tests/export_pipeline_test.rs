// ==========================================
// Export pipeline integration tests
// ==========================================
// Target: the full validate -> project -> serialize flow, including
// cancellation, failure wrapping, lifecycle events and the hard
// record ceiling.
// ==========================================


#[cfg(test)]
mod export_pipeline_test {
    use crate::test_helpers::{config_with_columns, engine, sample_records};
    use daily_works_exchange::export::serializer::{
        Blob, FormatSerializer, SerializeOptions,
    };
    use daily_works_exchange::export::NullUserDirectory;
    use daily_works_exchange::{
        AnalyticsSink, CancelToken, CsvSerializer, ExportError, ExportPipeline, OptionalSink,
        OutputFormat, PipelineEvent, UserPermissions,
    };
    use std::error::Error;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    // ===== mock collaborators =====

    /// Counts invocations, then delegates to the real CSV serializer.
    struct CountingSerializer {
        calls: Arc<AtomicUsize>,
    }

    impl FormatSerializer for CountingSerializer {
        fn format(&self) -> OutputFormat {
            OutputFormat::Csv
        }

        fn serialize(
            &self,
            rows: &[Vec<String>],
            headers: &[String],
            options: &SerializeOptions,
        ) -> Result<Blob, Box<dyn Error + Send + Sync>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            CsvSerializer.serialize(rows, headers, options)
        }
    }

    struct FailingSerializer;

    impl FormatSerializer for FailingSerializer {
        fn format(&self) -> OutputFormat {
            OutputFormat::Csv
        }

        fn serialize(
            &self,
            _rows: &[Vec<String>],
            _headers: &[String],
            _options: &SerializeOptions,
        ) -> Result<Blob, Box<dyn Error + Send + Sync>> {
            Err("disk full".into())
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        events: Mutex<Vec<PipelineEvent>>,
    }

    impl AnalyticsSink for RecordingSink {
        fn record(&self, event: PipelineEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    fn pipeline_with(serializer: Box<dyn FormatSerializer>, sink: OptionalSink) -> ExportPipeline {
        ExportPipeline::new(
            engine(),
            vec![serializer],
            Arc::new(NullUserDirectory),
            sink,
        )
    }

    fn noop_progress() -> impl Fn(u8) + Send + Sync {
        |_pct| {}
    }

    // ===== scenarios =====

    #[tokio::test]
    async fn test_clean_export_end_to_end() {
        let pipeline = pipeline_with(Box::new(CsvSerializer), OptionalSink::none());
        let config = config_with_columns(&[
            "date",
            "rfi_number",
            "status",
            "work_type",
            "location",
        ]);
        let records = sample_records(100);

        let percentages: Arc<Mutex<Vec<u8>>> = Arc::new(Mutex::new(Vec::new()));
        let sink_pcts = percentages.clone();
        let progress = move |pct: u8| sink_pcts.lock().unwrap().push(pct);

        let outcome = pipeline
            .run(
                &records,
                &config,
                &UserPermissions::default(),
                "batch-clean",
                &progress,
                &CancelToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(outcome.record_count, 100);
        assert_eq!(outcome.column_count, 5);
        assert_eq!(outcome.file_name, "daily_works.csv");
        assert!(!outcome.blob.is_empty());

        let text = String::from_utf8(outcome.blob.bytes).unwrap();
        assert!(text.starts_with("Date,RFI Number,Status,Work Type,Location"));
        assert!(text.contains("RFI-0042"));

        let pcts = percentages.lock().unwrap();
        assert_eq!(*pcts.last().unwrap(), 100);
        assert!(pcts.windows(2).all(|w| w[0] <= w[1]));
    }

    #[tokio::test]
    async fn test_invalid_config_never_reaches_serializer() {
        let calls = Arc::new(AtomicUsize::new(0));
        let pipeline = pipeline_with(
            Box::new(CountingSerializer {
                calls: calls.clone(),
            }),
            OptionalSink::none(),
        );
        // status missing from the selection
        let config = config_with_columns(&["date", "rfi_number"]);

        let err = pipeline
            .run(
                &sample_records(5),
                &config,
                &UserPermissions::default(),
                "t",
                &noop_progress(),
                &CancelToken::new(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ExportError::Invalid { .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_oversized_batch_hard_failure() {
        let calls = Arc::new(AtomicUsize::new(0));
        let pipeline = pipeline_with(
            Box::new(CountingSerializer {
                calls: calls.clone(),
            }),
            OptionalSink::none(),
        );
        let config = config_with_columns(&["date", "rfi_number", "status"]);
        let records = sample_records(60_000);

        let err = pipeline
            .run(
                &records,
                &config,
                &UserPermissions::default(),
                "t-big",
                &noop_progress(),
                &CancelToken::new(),
            )
            .await
            .unwrap_err();

        match err {
            ExportError::Invalid { result, .. } => {
                assert!(result
                    .schema_errors
                    .iter()
                    .any(|i| i.message.contains("50000") || i.message.contains("50,000")));
            }
            other => panic!("expected Invalid, got {:?}", other),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_record_set_is_no_data() {
        let pipeline = pipeline_with(Box::new(CsvSerializer), OptionalSink::none());
        let err = pipeline
            .run(
                &[],
                &config_with_columns(&["date", "rfi_number", "status"]),
                &UserPermissions::default(),
                "t",
                &noop_progress(),
                &CancelToken::new(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ExportError::NoData));
    }

    #[tokio::test]
    async fn test_pre_signalled_cancellation() {
        let calls = Arc::new(AtomicUsize::new(0));
        let pipeline = pipeline_with(
            Box::new(CountingSerializer {
                calls: calls.clone(),
            }),
            OptionalSink::none(),
        );
        let cancel = CancelToken::new();
        cancel.cancel();

        let err = pipeline
            .run(
                &sample_records(10),
                &config_with_columns(&["date", "rfi_number", "status"]),
                &UserPermissions::default(),
                "t",
                &noop_progress(),
                &cancel,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ExportError::Cancelled));
        assert!(err.is_cancellation());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_serializer_failure_preserves_message() {
        let pipeline = pipeline_with(Box::new(FailingSerializer), OptionalSink::none());
        let err = pipeline
            .run(
                &sample_records(3),
                &config_with_columns(&["date", "rfi_number", "status"]),
                &UserPermissions::default(),
                "t",
                &noop_progress(),
                &CancelToken::new(),
            )
            .await
            .unwrap_err();

        match err {
            ExportError::SerializationFailed { format, message } => {
                assert_eq!(format, "csv");
                assert!(message.contains("disk full"));
            }
            other => panic!("expected SerializationFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_serializer_for_format() {
        // Pipeline only carries the CSV serializer; ask for spreadsheet
        let pipeline = pipeline_with(Box::new(CsvSerializer), OptionalSink::none());
        let mut config = config_with_columns(&["date", "rfi_number", "status"]);
        config.output_format = OutputFormat::Spreadsheet;

        let err = pipeline
            .run(
                &sample_records(3),
                &config,
                &UserPermissions::default(),
                "t",
                &noop_progress(),
                &CancelToken::new(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ExportError::MissingSerializer(_)));
    }

    #[tokio::test]
    async fn test_lifecycle_events_emitted() {
        let sink = Arc::new(RecordingSink::default());
        let pipeline = pipeline_with(
            Box::new(CsvSerializer),
            OptionalSink::with_sink(sink.clone()),
        );

        pipeline
            .run(
                &sample_records(5),
                &config_with_columns(&["date", "rfi_number", "status"]),
                &UserPermissions::default(),
                "t",
                &noop_progress(),
                &CancelToken::new(),
            )
            .await
            .unwrap();

        let events = sink.events.lock().unwrap();
        assert!(matches!(events.first(), Some(PipelineEvent::Started { .. })));
        assert!(matches!(events.last(), Some(PipelineEvent::Completed { .. })));
        assert!(events
            .iter()
            .any(|e| matches!(e, PipelineEvent::Progress { percent: 100, .. })));
    }

    #[tokio::test]
    async fn test_cancelled_run_emits_cancelled_event() {
        let sink = Arc::new(RecordingSink::default());
        let pipeline = pipeline_with(
            Box::new(CsvSerializer),
            OptionalSink::with_sink(sink.clone()),
        );
        let cancel = CancelToken::new();
        cancel.cancel();

        let _ = pipeline
            .run(
                &sample_records(5),
                &config_with_columns(&["date", "rfi_number", "status"]),
                &UserPermissions::default(),
                "t",
                &noop_progress(),
                &cancel,
            )
            .await;

        let events = sink.events.lock().unwrap();
        assert!(events
            .iter()
            .any(|e| matches!(e, PipelineEvent::Cancelled { .. })));
    }

    #[tokio::test]
    async fn test_metadata_section_included_when_requested() {
        let pipeline = pipeline_with(Box::new(CsvSerializer), OptionalSink::none());
        let mut config = config_with_columns(&["date", "rfi_number", "status"]);
        config.include_metadata_sheet = true;

        let outcome = pipeline
            .run(
                &sample_records(4),
                &config,
                &UserPermissions::default(),
                "t",
                &noop_progress(),
                &CancelToken::new(),
            )
            .await
            .unwrap();

        let text = String::from_utf8(outcome.blob.bytes).unwrap();
        assert!(text.contains("Record Count,4"));
        assert!(text.contains("Performance Mode,balanced"));
    }
}
