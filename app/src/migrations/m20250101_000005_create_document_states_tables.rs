use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

fn id<T: Iden + 'static>(column: T) -> ColumnDef {
    ColumnDef::new(column)
        .big_integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Workflows::Table)
                    .if_not_exists()
                    .col(&mut id(Workflows::Id))
                    .col(ColumnDef::new(Workflows::Label).string_len(255).not_null().unique_key())
                    .col(
                        ColumnDef::new(Workflows::InternalName)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(WorkflowStates::Table)
                    .if_not_exists()
                    .col(&mut id(WorkflowStates::Id))
                    .col(ColumnDef::new(WorkflowStates::WorkflowId).big_integer().not_null())
                    .col(ColumnDef::new(WorkflowStates::Label).string_len(255).not_null())
                    .col(
                        ColumnDef::new(WorkflowStates::Initial)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(WorkflowStates::Completion)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_workflow_states_workflow")
                            .from(WorkflowStates::Table, WorkflowStates::WorkflowId)
                            .to(Workflows::Table, Workflows::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_workflow_states_workflow_label")
                    .table(WorkflowStates::Table)
                    .col(WorkflowStates::WorkflowId)
                    .col(WorkflowStates::Label)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(WorkflowTransitions::Table)
                    .if_not_exists()
                    .col(&mut id(WorkflowTransitions::Id))
                    .col(
                        ColumnDef::new(WorkflowTransitions::WorkflowId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(WorkflowTransitions::Label).string_len(255).not_null())
                    .col(
                        ColumnDef::new(WorkflowTransitions::OriginStateId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WorkflowTransitions::DestinationStateId)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_workflow_transitions_workflow")
                            .from(WorkflowTransitions::Table, WorkflowTransitions::WorkflowId)
                            .to(Workflows::Table, Workflows::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_workflow_transitions_origin")
                            .from(WorkflowTransitions::Table, WorkflowTransitions::OriginStateId)
                            .to(WorkflowStates::Table, WorkflowStates::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_workflow_transitions_destination")
                            .from(
                                WorkflowTransitions::Table,
                                WorkflowTransitions::DestinationStateId,
                            )
                            .to(WorkflowStates::Table, WorkflowStates::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(WorkflowStateActions::Table)
                    .if_not_exists()
                    .col(&mut id(WorkflowStateActions::Id))
                    .col(
                        ColumnDef::new(WorkflowStateActions::StateId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(WorkflowStateActions::Label).string_len(255).not_null())
                    .col(
                        ColumnDef::new(WorkflowStateActions::Enabled)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(WorkflowStateActions::When).integer().not_null())
                    .col(
                        ColumnDef::new(WorkflowStateActions::ActionPath)
                            .string_len(128)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WorkflowStateActions::ActionData)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_workflow_state_actions_state")
                            .from(WorkflowStateActions::Table, WorkflowStateActions::StateId)
                            .to(WorkflowStates::Table, WorkflowStates::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(WorkflowTransitionTriggerEvents::Table)
                    .if_not_exists()
                    .col(&mut id(WorkflowTransitionTriggerEvents::Id))
                    .col(
                        ColumnDef::new(WorkflowTransitionTriggerEvents::TransitionId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WorkflowTransitionTriggerEvents::EventTypeId)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_trigger_events_transition")
                            .from(
                                WorkflowTransitionTriggerEvents::Table,
                                WorkflowTransitionTriggerEvents::TransitionId,
                            )
                            .to(WorkflowTransitions::Table, WorkflowTransitions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_trigger_events_event_type")
                            .from(
                                WorkflowTransitionTriggerEvents::Table,
                                WorkflowTransitionTriggerEvents::EventTypeId,
                            )
                            .to(EventTypes::Table, EventTypes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(WorkflowInstances::Table)
                    .if_not_exists()
                    .col(&mut id(WorkflowInstances::Id))
                    .col(ColumnDef::new(WorkflowInstances::WorkflowId).big_integer().not_null())
                    .col(ColumnDef::new(WorkflowInstances::DocumentId).big_integer().not_null())
                    .col(
                        ColumnDef::new(WorkflowInstances::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_workflow_instances_workflow")
                            .from(WorkflowInstances::Table, WorkflowInstances::WorkflowId)
                            .to(Workflows::Table, Workflows::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_workflow_instances_document")
                    .table(WorkflowInstances::Table)
                    .col(WorkflowInstances::WorkflowId)
                    .col(WorkflowInstances::DocumentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(WorkflowInstanceLogEntries::Table)
                    .if_not_exists()
                    .col(&mut id(WorkflowInstanceLogEntries::Id))
                    .col(
                        ColumnDef::new(WorkflowInstanceLogEntries::InstanceId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WorkflowInstanceLogEntries::TransitionId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WorkflowInstanceLogEntries::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WorkflowInstanceLogEntries::Comment)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(WorkflowInstanceLogEntries::Datetime)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_log_entries_instance")
                            .from(
                                WorkflowInstanceLogEntries::Table,
                                WorkflowInstanceLogEntries::InstanceId,
                            )
                            .to(WorkflowInstances::Table, WorkflowInstances::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_log_entries_transition")
                            .from(
                                WorkflowInstanceLogEntries::Table,
                                WorkflowInstanceLogEntries::TransitionId,
                            )
                            .to(WorkflowTransitions::Table, WorkflowTransitions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_log_entries_user")
                            .from(
                                WorkflowInstanceLogEntries::Table,
                                WorkflowInstanceLogEntries::UserId,
                            )
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_log_entries_instance_datetime")
                    .table(WorkflowInstanceLogEntries::Table)
                    .col(WorkflowInstanceLogEntries::InstanceId)
                    .col(WorkflowInstanceLogEntries::Datetime)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WorkflowInstanceLogEntries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(WorkflowInstances::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(WorkflowTransitionTriggerEvents::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(WorkflowStateActions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(WorkflowTransitions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(WorkflowStates::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Workflows::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum EventTypes {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Workflows {
    Table,
    Id,
    Label,
    InternalName,
}

#[derive(DeriveIden)]
enum WorkflowStates {
    Table,
    Id,
    WorkflowId,
    Label,
    Initial,
    Completion,
}

#[derive(DeriveIden)]
enum WorkflowTransitions {
    Table,
    Id,
    WorkflowId,
    Label,
    OriginStateId,
    DestinationStateId,
}

#[derive(DeriveIden)]
enum WorkflowStateActions {
    Table,
    Id,
    StateId,
    Label,
    Enabled,
    When,
    ActionPath,
    ActionData,
}

#[derive(DeriveIden)]
enum WorkflowTransitionTriggerEvents {
    Table,
    Id,
    TransitionId,
    EventTypeId,
}

#[derive(DeriveIden)]
enum WorkflowInstances {
    Table,
    Id,
    WorkflowId,
    DocumentId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum WorkflowInstanceLogEntries {
    Table,
    Id,
    InstanceId,
    TransitionId,
    UserId,
    Comment,
    Datetime,
}
