//! One command constructor per admin capability.
//!
//! Each takes only the narrow capability it calls, runs it, and maps the
//! outcome to a result action or an [`Action::Error`] tagged with the
//! operation. None of them touch page state.

use std::sync::Arc;

use futures::StreamExt;
use uuid::Uuid;

use kestrel_core::{
    AdminError, CGroupDeleter, CGroupLister, ConfigLister, ConfigUpdater, OffsetLister, Operation,
    ProducerRecord, Publisher, ReadDetails, RecordReader, RecordStream, ResourceRef, SchemaLister,
    SchemaRegistryDetails, SraSetter, SubjectLister, TopicCreationDetails, TopicCreator,
    TopicDeleter, TopicLister,
};

use crate::action::{Action, ListingStarted};
use crate::command::Command;

fn settle<T>(operation: Operation, result: Result<T, AdminError>, ok: impl FnOnce(T) -> Action) -> Action {
    match result {
        Ok(value) => ok(value),
        Err(cause) => {
            tracing::warn!(%operation, error = %cause, "admin operation failed");
            Action::error(operation, cause)
        }
    }
}

// ── Topics ──────────────────────────────────────────────────────────

pub fn list_topics(lister: Arc<dyn TopicLister>) -> Command {
    let op = Operation::ListTopics;
    Command::new(op, async move {
        settle(op, lister.list_topics().await, Action::TopicsListed)
    })
}

pub fn create_topic(creator: Arc<dyn TopicCreator>, details: TopicCreationDetails) -> Command {
    let op = Operation::CreateTopic;
    Command::new(op, async move {
        let name = details.name.clone();
        settle(op, creator.create_topic(details).await, |()| {
            Action::TopicCreated { name }
        })
    })
}

pub fn delete_topic(deleter: Arc<dyn TopicDeleter>, name: String) -> Command {
    let op = Operation::DeleteTopic;
    Command::new(op, async move {
        settle(op, deleter.delete_topic(&name).await, |()| {
            Action::TopicDeleted { name }
        })
    })
}

pub fn publish(publisher: Arc<dyn Publisher>, record: ProducerRecord) -> Command {
    let op = Operation::Publish;
    Command::new(op, async move {
        let topic = record.topic.clone();
        settle(op, publisher.publish(record).await, |result| {
            Action::Published { topic, result }
        })
    })
}

/// Open a record stream. The started action carries the command pulling
/// the first record; every received record carries the next pull.
pub fn read_records(reader: Arc<dyn RecordReader>, details: ReadDetails, read_id: Uuid) -> Command {
    let op = Operation::ReadRecords;
    Command::new(op, async move {
        settle(op, reader.read_records(details).await, |stream| {
            Action::RecordsReadStarted {
                read_id,
                next: Some(pull_record(stream, read_id)),
            }
        })
    })
}

fn pull_record(mut stream: RecordStream, read_id: Uuid) -> Command {
    let op = Operation::ReadRecords;
    Command::new(op, async move {
        match stream.next().await {
            Some(Ok(record)) => Action::RecordReceived {
                read_id,
                record,
                next: Some(pull_record(stream, read_id)),
            },
            Some(Err(cause)) => Action::error(op, cause),
            None => Action::RecordsReadFinished { read_id },
        }
    })
}

pub fn list_configs(lister: Arc<dyn ConfigLister>, resource: ResourceRef) -> Command {
    let op = Operation::ListConfigs;
    Command::new(op, async move {
        settle(op, lister.list_configs(&resource).await, |configs| {
            Action::ConfigsListed { resource, configs }
        })
    })
}

pub fn update_config(
    updater: Arc<dyn ConfigUpdater>,
    resource: ResourceRef,
    key: String,
    value: String,
) -> Command {
    let op = Operation::UpdateConfig;
    Command::new(op, async move {
        let result = updater.update_config(&resource, &key, &value).await;
        settle(op, result, |()| Action::ConfigUpdated {
            resource,
            key,
            value,
        })
    })
}

// ── Consumer groups ─────────────────────────────────────────────────

/// Two-phase listing: resolves at once to
/// [`Action::ConsumerGroupListingStarted`], whose completion command does
/// the actual listing once the receiver schedules it.
pub fn list_cgroups(lister: Arc<dyn CGroupLister>) -> Command {
    let op = Operation::ListConsumerGroups;
    let completion = Command::new(op, async move {
        settle(
            op,
            lister.list_consumer_groups().await,
            Action::ConsumerGroupsListed,
        )
    });
    Command::new(op, async move {
        Action::ConsumerGroupListingStarted(ListingStarted::new(completion))
    })
}

pub fn delete_cgroup(deleter: Arc<dyn CGroupDeleter>, name: String) -> Command {
    let op = Operation::DeleteConsumerGroup;
    Command::new(op, async move {
        settle(op, deleter.delete_consumer_group(&name).await, |()| {
            Action::ConsumerGroupDeleted { name }
        })
    })
}

pub fn list_offsets(lister: Arc<dyn OffsetLister>, group: String) -> Command {
    let op = Operation::ListOffsets;
    Command::new(op, async move {
        settle(op, lister.list_offsets(&group).await, |offsets| {
            Action::OffsetsListed { group, offsets }
        })
    })
}

// ── Schema registry ─────────────────────────────────────────────────

pub fn set_schema_registry(setter: Arc<dyn SraSetter>, details: SchemaRegistryDetails) -> Command {
    let op = Operation::SetSchemaRegistryConnection;
    Command::new(op, async move {
        settle(op, setter.set_schema_registry(details).await, |()| {
            Action::SchemaRegistryConnected
        })
    })
}

pub fn list_subjects(lister: Arc<dyn SubjectLister>) -> Command {
    let op = Operation::ListSubjects;
    Command::new(op, async move {
        settle(op, lister.list_subjects().await, Action::SubjectsListed)
    })
}

pub fn list_versions(lister: Arc<dyn SchemaLister>, subject: String, versions: Vec<u32>) -> Command {
    let op = Operation::ListVersions;
    Command::new(op, async move {
        settle(op, lister.list_versions(&subject, &versions).await, |schemas| {
            Action::SchemasListed { subject, schemas }
        })
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use kestrel_core::{ErrorKind, SandboxCluster};

    #[tokio::test]
    async fn delete_missing_topic_is_an_error_envelope() {
        let cluster = Arc::new(SandboxCluster::with_demo_data());
        let action = delete_topic(cluster, "does-not-exist".into()).run().await;
        match action {
            Action::Error(envelope) => {
                assert_eq!(envelope.operation, Operation::DeleteTopic);
                assert_eq!(envelope.cause.kind(), ErrorKind::NotFound);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn group_listing_starts_before_listing() {
        let cluster = Arc::new(SandboxCluster::with_demo_data());
        let started = list_cgroups(cluster).run().await;
        let Action::ConsumerGroupListingStarted(mut started) = started else {
            panic!("listing must start first");
        };
        let completion = started.completion.take().unwrap();
        assert_eq!(completion.operation(), Some(Operation::ListConsumerGroups));

        match completion.run().await {
            Action::ConsumerGroupsListed(groups) => assert!(!groups.is_empty()),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn record_stream_is_pulled_one_at_a_time() {
        let cluster = Arc::new(SandboxCluster::with_demo_data());
        let read_id = Uuid::new_v4();
        let details = ReadDetails {
            topic: "audit-log".into(),
            partition: 0,
            start_offset: 0,
            limit: 2,
        };

        let mut next = match read_records(cluster, details, read_id).run().await {
            Action::RecordsReadStarted { next, .. } => next,
            other => panic!("unexpected {other:?}"),
        };
        let mut offsets = Vec::new();
        while let Some(command) = next.take() {
            match command.run().await {
                Action::RecordReceived { record, next: more, .. } => {
                    offsets.push(record.offset);
                    next = more;
                }
                Action::RecordsReadFinished { read_id: id } => assert_eq!(id, read_id),
                other => panic!("unexpected {other:?}"),
            }
        }
        assert_eq!(offsets, vec![0, 1]);
    }
}
