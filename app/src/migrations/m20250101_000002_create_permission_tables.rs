use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Roles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Roles::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Roles::Label).string().not_null().unique_key())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RoleGroups::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RoleGroups::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(RoleGroups::RoleId).big_integer().not_null())
                    .col(ColumnDef::new(RoleGroups::GroupId).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_role_groups_role")
                            .from(RoleGroups::Table, RoleGroups::RoleId)
                            .to(Roles::Table, Roles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_role_groups_group")
                            .from(RoleGroups::Table, RoleGroups::GroupId)
                            .to(Groups::Table, Groups::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(StoredPermissions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StoredPermissions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(StoredPermissions::Namespace).string().not_null())
                    .col(ColumnDef::new(StoredPermissions::Name).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_stored_permissions_namespace_name")
                    .table(StoredPermissions::Table)
                    .col(StoredPermissions::Namespace)
                    .col(StoredPermissions::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RolePermissions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RolePermissions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(RolePermissions::RoleId).big_integer().not_null())
                    .col(
                        ColumnDef::new(RolePermissions::StoredPermissionId)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_role_permissions_role")
                            .from(RolePermissions::Table, RolePermissions::RoleId)
                            .to(Roles::Table, Roles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_role_permissions_permission")
                            .from(RolePermissions::Table, RolePermissions::StoredPermissionId)
                            .to(StoredPermissions::Table, StoredPermissions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AccessControlLists::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AccessControlLists::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AccessControlLists::RoleId).big_integer().not_null())
                    .col(ColumnDef::new(AccessControlLists::ContentType).string().not_null())
                    .col(ColumnDef::new(AccessControlLists::ObjectId).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_access_control_lists_role")
                            .from(AccessControlLists::Table, AccessControlLists::RoleId)
                            .to(Roles::Table, Roles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_access_control_lists_object")
                    .table(AccessControlLists::Table)
                    .col(AccessControlLists::RoleId)
                    .col(AccessControlLists::ContentType)
                    .col(AccessControlLists::ObjectId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AclPermissions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AclPermissions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AclPermissions::AclId).big_integer().not_null())
                    .col(
                        ColumnDef::new(AclPermissions::StoredPermissionId)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_acl_permissions_acl")
                            .from(AclPermissions::Table, AclPermissions::AclId)
                            .to(AccessControlLists::Table, AccessControlLists::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_acl_permissions_permission")
                            .from(AclPermissions::Table, AclPermissions::StoredPermissionId)
                            .to(StoredPermissions::Table, StoredPermissions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AclPermissions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AccessControlLists::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RolePermissions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(StoredPermissions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RoleGroups::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Roles::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Groups {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Roles {
    Table,
    Id,
    Label,
}

#[derive(DeriveIden)]
enum RoleGroups {
    Table,
    Id,
    RoleId,
    GroupId,
}

#[derive(DeriveIden)]
enum StoredPermissions {
    Table,
    Id,
    Namespace,
    Name,
}

#[derive(DeriveIden)]
enum RolePermissions {
    Table,
    Id,
    RoleId,
    StoredPermissionId,
}

#[derive(DeriveIden)]
enum AccessControlLists {
    Table,
    Id,
    RoleId,
    ContentType,
    ObjectId,
}

#[derive(DeriveIden)]
enum AclPermissions {
    Table,
    Id,
    AclId,
    StoredPermissionId,
}
